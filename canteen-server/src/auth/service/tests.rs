use super::*;
use crate::auth::jwt::JwtConfig;
use crate::auth::mailer::MemoryMailer;

const DOMAIN: &str = "iiitkottayam.ac.in";
const EMAIL: &str = "asha@iiitkottayam.ac.in";
const PASSWORD: &str = "Masala#Dosa42";

fn setup() -> (AuthService, MemoryMailer) {
    let store = RecordStore::open_in_memory().unwrap();
    let jwt = Arc::new(JwtService::with_config(JwtConfig::default()).unwrap());
    let mailer = MemoryMailer::new();
    let auth = AuthService::new(store, jwt, Arc::new(mailer.clone()), DOMAIN, 10);
    (auth, mailer)
}

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Asha".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        student_id: Some("2021BCS0001".to_string()),
    }
}

async fn register_and_verify(auth: &AuthService, mailer: &MemoryMailer) -> UserInfo {
    auth.register(register_request(EMAIL, PASSWORD)).await.unwrap();
    let code = mailer
        .last_code(EMAIL, OtpPurpose::EmailVerification)
        .unwrap();
    auth.verify_otp(EMAIL, &code).unwrap()
}

#[tokio::test]
async fn test_register_creates_unverified_student() {
    let (auth, mailer) = setup();
    let user = auth
        .register(register_request("  Asha@IIITKottayam.ac.in ", PASSWORD))
        .await
        .unwrap();

    assert_eq!(user.email, EMAIL);
    assert_eq!(user.role, UserRole::Student);
    assert!(!user.is_verified);
    assert_eq!(user.loyalty_points, 0);
    assert!(mailer.last_code(EMAIL, OtpPurpose::EmailVerification).is_some());
}

#[tokio::test]
async fn test_register_rejects_other_domains() {
    let (auth, mailer) = setup();
    let err = auth
        .register(register_request("asha@gmail.com", PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailDomainNotAllowed);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let (auth, _) = setup();
    let err = auth
        .register(register_request(EMAIL, "password"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PasswordTooWeak);
    assert!(auth.find_user(EMAIL).unwrap().is_none());
}

#[tokio::test]
async fn test_register_twice() {
    let (auth, _) = setup();
    auth.register(register_request(EMAIL, PASSWORD)).await.unwrap();
    let err = auth
        .register(register_request(EMAIL, PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailAlreadyRegistered);
}

#[tokio::test]
async fn test_login_requires_verification() {
    let (auth, _) = setup();
    auth.register(register_request(EMAIL, PASSWORD)).await.unwrap();
    let err = auth.login(EMAIL, PASSWORD).unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailNotVerified);
}

#[tokio::test]
async fn test_verify_then_login() {
    let (auth, mailer) = setup();
    let user = register_and_verify(&auth, &mailer).await;
    assert!(user.is_verified);

    let login = auth.login(EMAIL, PASSWORD).unwrap();
    assert_eq!(login.user.id, user.id);
    assert!(!login.token.is_empty());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let (auth, mailer) = setup();
    register_and_verify(&auth, &mailer).await;

    let wrong_password = auth.login(EMAIL, "Wrong#Pass99").unwrap_err();
    let unknown_user = auth
        .login("nobody@iiitkottayam.ac.in", PASSWORD)
        .unwrap_err();
    assert_eq!(wrong_password.code, ErrorCode::InvalidCredentials);
    assert_eq!(wrong_password.code, unknown_user.code);
    assert_eq!(wrong_password.message, unknown_user.message);
}

#[tokio::test]
async fn test_send_otp_for_verified_user_rejected() {
    let (auth, mailer) = setup();
    register_and_verify(&auth, &mailer).await;
    let err = auth.send_otp(EMAIL).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn test_send_otp_respects_cooldown() {
    let (auth, _) = setup();
    auth.register(register_request(EMAIL, PASSWORD)).await.unwrap();
    let err = auth.send_otp(EMAIL).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResendTooSoon);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (auth, mailer) = setup();
    register_and_verify(&auth, &mailer).await;

    auth.reset_password(EMAIL).await.unwrap();
    let code = mailer.last_code(EMAIL, OtpPurpose::PasswordReset).unwrap();

    let err = auth.update_password(EMAIL, &code, "weak").unwrap_err();
    assert_eq!(err.code, ErrorCode::PasswordTooWeak);

    auth.update_password(EMAIL, &code, "Paneer@Tikka77").unwrap();
    assert!(auth.login(EMAIL, PASSWORD).is_err());
    assert!(auth.login(EMAIL, "Paneer@Tikka77").is_ok());

    // Code already consumed
    let err = auth
        .update_password(EMAIL, &code, "Another@Pass88")
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
}

#[tokio::test]
async fn test_reset_for_unknown_email_is_silent() {
    let (auth, mailer) = setup();
    auth.reset_password("ghost@iiitkottayam.ac.in").await.unwrap();
    assert!(mailer.sent().is_empty());

    let err = auth.reset_password("ghost@gmail.com").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailDomainNotAllowed);
}

#[test]
fn test_ensure_manager_is_idempotent() {
    let (auth, _) = setup();
    let first = auth
        .ensure_manager("canteen@iiitkottayam.ac.in", "Canteen@Admin1", "Canteen Manager")
        .unwrap();
    let second = auth
        .ensure_manager("canteen@iiitkottayam.ac.in", "Canteen@Admin2", "Canteen Manager")
        .unwrap();
    assert_eq!(first, second);

    let login = auth
        .login("canteen@iiitkottayam.ac.in", "Canteen@Admin2")
        .unwrap();
    assert_eq!(login.user.role, UserRole::Manager);
    assert!(login.user.is_verified);
}
