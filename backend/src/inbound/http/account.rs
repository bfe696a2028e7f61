//! Account API handlers: registration, OTP flows, login and the caller's
//! own profile.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"a@b.in","password":"s3cretpass","fullName":"Asha Rao"}
//! POST /api/v1/auth/verify-email {"email":"a@b.in","code":"123456"}
//! POST /api/v1/auth/login {"email":"a@b.in","password":"s3cretpass"}
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{ProfilePatch, RegisterRequest, ResetPasswordRequest};
use crate::domain::{
    Email, Error, FullName, LoginCredentials, OtpCode, OtpPurpose, Password, PhoneNumber,
    RawPassword, UserRole, WebUrl,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AccountDto, AuthSessionDto};
use crate::inbound::http::envelope::{Envelope, MessageDto, acknowledged, created, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, require};

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_email(raw: Option<&str>) -> Result<Email, Error> {
    Ok(Email::parse(require(raw, "email")?)?)
}

fn parse_code(raw: Option<&str>) -> Result<OtpCode, Error> {
    Ok(OtpCode::parse(require(raw, "code")?)?)
}

/// Registration body for `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    /// 8 to 128 characters with at least one letter and one digit.
    pub password: Option<String>,
    #[schema(example = "Asha Rao")]
    pub full_name: Option<String>,
    /// `user` (default) or `facility_owner`.
    pub role: Option<String>,
    #[schema(example = "+919876543210")]
    pub phone: Option<String>,
}

impl TryFrom<RegisterBody> for RegisterRequest {
    type Error = Error;

    fn try_from(value: RegisterBody) -> Result<Self, Self::Error> {
        let email = parse_email(value.email.as_deref())?;
        let password = Password::new("password", require(value.password.as_deref(), "password")?)?;
        let full_name = FullName::parse(require(value.full_name.as_deref(), "fullName")?)?;
        let role = parse_optional::<UserRole>(value.role.as_deref())?.unwrap_or(UserRole::User);
        let phone = value
            .phone
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()?;
        Ok(Self {
            email,
            password,
            full_name,
            role,
            phone,
        })
    }
}

/// Identifier of a freshly registered account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDto {
    pub user_id: Uuid,
    pub message: String,
}

/// Create an unverified account and email a verification code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = Envelope<RegisteredDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Mail relay unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let request = RegisterRequest::try_from(payload.into_inner())?;
    let user_id = state.accounts.register(request).await?;
    Ok(created(RegisteredDto {
        user_id: *user_id.as_uuid(),
        message: "verification code sent".to_owned(),
    }))
}

/// Email plus one-time code.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailBody {
    pub email: Option<String>,
    #[schema(example = "123456")]
    pub code: Option<String>,
}

/// Confirm an email address and sign in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-email",
    request_body = VerifyEmailBody,
    responses(
        (status = 200, description = "Verified and signed in", body = Envelope<AuthSessionDto>),
        (status = 400, description = "Invalid, expired or unknown code", body = ErrorSchema),
        (status = 429, description = "Too many attempts", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "verifyEmail",
    security([])
)]
#[post("/auth/verify-email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyEmailBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let email = parse_email(body.email.as_deref())?;
    let code = parse_code(body.code.as_deref())?;
    let session = state.accounts.verify_email(&email, &code).await?;
    Ok(ok(AuthSessionDto::from(session)))
}

/// Request for a fresh one-time code.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpBody {
    pub email: Option<String>,
    /// `email_verification` (default) or `password_reset`.
    pub purpose: Option<String>,
}

/// Send a fresh code, subject to a cooldown.
#[utoipa::path(
    post,
    path = "/api/v1/auth/resend-otp",
    request_body = ResendOtpBody,
    responses(
        (
            status = 200,
            description = "Code sent when the account exists",
            body = Envelope<MessageDto>
        ),
        (status = 400, description = "Invalid request or already verified", body = ErrorSchema),
        (status = 429, description = "Cooldown active", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resendOtp",
    security([])
)]
#[post("/auth/resend-otp")]
pub async fn resend_otp(
    state: web::Data<HttpState>,
    payload: web::Json<ResendOtpBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let email = parse_email(body.email.as_deref())?;
    let purpose = parse_optional::<OtpPurpose>(body.purpose.as_deref())?
        .unwrap_or(OtpPurpose::EmailVerification);
    state.accounts.resend_otp(&email, purpose).await?;
    Ok(acknowledged(
        "if the account exists, a new code has been sent",
    ))
}

/// Email and password sign-in.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = Envelope<AuthSessionDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Unverified or banned account", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials {
        email: parse_email(body.email.as_deref())?,
        password: RawPassword::new("password", require(body.password.as_deref(), "password")?)?,
    };
    let session = state.accounts.login(&credentials).await?;
    Ok(ok(AuthSessionDto::from(session)))
}

/// Address to send a password-reset code to.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordBody {
    pub email: Option<String>,
}

/// Email a password-reset code; answers the same for unknown addresses.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordBody,
    responses(
        (status = 200, description = "Accepted", body = Envelope<MessageDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 429, description = "Cooldown active", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordBody>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(payload.email.as_deref())?;
    state.accounts.forgot_password(&email).await?;
    Ok(acknowledged(
        "if the account exists, a reset code has been sent",
    ))
}

/// Reset code plus the replacement password.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    pub email: Option<String>,
    pub code: Option<String>,
    pub new_password: Option<String>,
}

/// Set a new password with a reset code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordBody,
    responses(
        (status = 200, description = "Password replaced", body = Envelope<MessageDto>),
        (status = 400, description = "Invalid, expired or unknown code", body = ErrorSchema),
        (status = 429, description = "Too many attempts", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = ResetPasswordRequest {
        email: parse_email(body.email.as_deref())?,
        code: parse_code(body.code.as_deref())?,
        new_password: Password::new(
            "newPassword",
            require(body.new_password.as_deref(), "newPassword")?,
        )?,
    };
    state.accounts.reset_password(request).await?;
    Ok(acknowledged("password updated"))
}

/// Current caller's account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = Envelope<AccountDto>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let account = state.accounts_query.profile(&caller.0).await?;
    Ok(ok(AccountDto::from(account)))
}

/// Profile edit; `null` clears `phone` or `avatarUrl`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub avatar_url: Option<Option<String>>,
}

impl TryFrom<UpdateProfileBody> for ProfilePatch {
    type Error = Error;

    fn try_from(value: UpdateProfileBody) -> Result<Self, Self::Error> {
        let full_name = value.full_name.as_deref().map(FullName::parse).transpose()?;
        let phone = value
            .phone
            .map(|phone| phone.as_deref().map(PhoneNumber::parse).transpose())
            .transpose()?;
        let avatar_url = value
            .avatar_url
            .map(|url| {
                url.as_deref()
                    .map(|raw| WebUrl::parse("avatarUrl", raw))
                    .transpose()
            })
            .transpose()?;
        Ok(Self {
            full_name,
            phone,
            avatar_url,
        })
    }
}

/// Edit the caller's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "Updated profile", body = Envelope<AccountDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<UpdateProfileBody>,
) -> ApiResult<HttpResponse> {
    let patch = ProfilePatch::try_from(payload.into_inner())?;
    let account = state.accounts.update_profile(&caller.0, patch).await?;
    Ok(ok(AccountDto::from(account)))
}

/// Password change for a signed-in account.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Replace the caller's password.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/password",
    request_body = ChangePasswordBody,
    responses(
        (status = 200, description = "Password replaced", body = Envelope<MessageDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Wrong current password", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[post("/users/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ChangePasswordBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let current = RawPassword::new(
        "currentPassword",
        require(body.current_password.as_deref(), "currentPassword")?,
    )?;
    let new_password = Password::new(
        "newPassword",
        require(body.new_password.as_deref(), "newPassword")?,
    )?;
    state
        .accounts
        .change_password(&caller.0, current, new_password)
        .await?;
    Ok(acknowledged("password updated"))
}

/// Password confirming account deletion.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountBody {
    pub password: Option<String>,
}

/// Soft-delete the caller's account after re-checking the password.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    request_body = DeleteAccountBody,
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Wrong password", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteCurrentUser"
)]
#[delete("/users/me")]
pub async fn delete_current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<DeleteAccountBody>,
) -> ApiResult<HttpResponse> {
    let password = RawPassword::new("password", require(payload.password.as_deref(), "password")?)?;
    state.accounts.delete_account(&caller.0, password).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the account routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(verify_email)
        .service(resend_otp)
        .service(login)
        .service(forgot_password)
        .service(reset_password)
        .service(current_user)
        .service(update_current_user)
        .service(change_password)
        .service(delete_current_user);
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
