//! Behavioural checks on the generated OpenAPI document.

use rstest::{fixture, rstest};
use utoipa::OpenApi;

use courtside::ApiDoc;

#[fixture]
fn document() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[rstest]
fn tags_are_declared_in_navigation_order(document: utoipa::openapi::OpenApi) {
    let tags: Vec<String> = document
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    insta::assert_json_snapshot!(tags, @r#"
    [
      "auth",
      "users",
      "catalogue",
      "reviews",
      "bookings",
      "payments",
      "owner",
      "notifications",
      "reports",
      "admin",
      "health"
    ]
    "#);
}

#[rstest]
#[case("/api/v1/auth/register", "post")]
#[case("/api/v1/venues", "get")]
#[case("/api/v1/courts/{id}/availability", "get")]
#[case("/api/v1/bookings/{id}/cancel", "post")]
#[case("/api/v1/payments/webhook", "post")]
#[case("/api/v1/owner/courts/{id}/blocks", "post")]
#[case("/api/v1/notifications/read-all", "post")]
#[case("/api/v1/admin/reports/{id}/resolve", "post")]
fn core_operations_are_documented(
    document: utoipa::openapi::OpenApi,
    #[case] path: &str,
    #[case] method: &str,
) {
    let item = document
        .paths
        .paths
        .get(path)
        .unwrap_or_else(|| panic!("{path} missing from document"));
    let operation = match method {
        "get" => item.get.as_ref(),
        "post" => item.post.as_ref(),
        _ => None,
    };
    let operation = operation.unwrap_or_else(|| panic!("{path} has no {method} operation"));
    assert!(
        operation.operation_id.is_some(),
        "{path} should carry an operation id"
    );
}

#[rstest]
fn every_fallible_operation_documents_an_error_response(document: utoipa::openapi::OpenApi) {
    for (path, item) in &document.paths.paths {
        if path.starts_with("/health") || path == "/api/v1/sports" {
            continue;
        }
        let operations = [
            &item.get,
            &item.post,
            &item.patch,
            &item.put,
            &item.delete,
        ];
        for operation in operations.into_iter().flatten() {
            let has_error = operation
                .responses
                .responses
                .keys()
                .any(|status| status.starts_with('4') || status.starts_with('5'));
            assert!(has_error, "{path} documents no error responses");
        }
    }
}
