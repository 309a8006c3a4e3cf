// crates/petmart-server/src/service/accounts.rs
// ============================================================================
// Module: Account Services
// Description: Registration with OTP, login, token refresh, logout, profiles.
// Purpose: Authenticate users and manage their profiles.
// Dependencies: petmart-core, serde
// ============================================================================

//! ## Overview
//! Registration is two-phase: [`MarketService::register`] stores a pending
//! registration and sends a code, and [`MarketService::verify_otp`] turns it
//! into a user. Login failures return one message whether or not the email
//! exists, and unknown emails still pay the password hashing cost.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::OtpVerification;
use petmart_core::PendingRegistration;
use petmart_core::PublicProfile;
use petmart_core::Timestamp;
use petmart_core::User;
use petmart_core::UserId;
use petmart_core::UserPatch;
use petmart_core::account::normalize_email;
use petmart_core::account::validate_address;
use petmart_core::account::validate_http_url;
use petmart_core::account::validate_name;
use petmart_core::account::validate_password;
use petmart_core::account::validate_phone;
use petmart_core::error::require_fields;
use serde::Deserialize;
use serde::Serialize;

use crate::audit::AccountAuditEvent;
use crate::error::ApiError;
use crate::notify::OtpMessage;
use crate::service::MarketService;
use crate::service::NO_INPUT_MESSAGE;
use crate::service::present;
use crate::token::TokenError;
use crate::token::TokenKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Login failure message, identical for unknown emails and bad passwords.
const LOGIN_FAILED: &str = "Invalid email or password";
/// OTP mismatch message.
const INVALID_OTP: &str = "Invalid OTP";
/// OTP email subject.
const OTP_SUBJECT: &str = "Your Petmart verification code";

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Registration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Plain password.
    pub password: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// OTP verification request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyOtpRequest {
    /// Email address.
    pub email: Option<String>,
    /// Submitted code.
    pub otp: Option<String>,
}

/// OTP resend request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResendOtpRequest {
    /// Email address.
    pub email: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: Option<String>,
    /// Plain password.
    pub password: Option<String>,
}

/// Refresh or logout request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: Option<String>,
}

/// Profile update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New profile photo URL.
    pub profile_photo_url: Option<String>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Pending registration summary.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationView {
    /// Email awaiting verification.
    pub email: String,
    /// Code expiry.
    pub expires_at: Timestamp,
}

/// Login result.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Refresh result.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    /// Access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl MarketService {
    /// Starts a registration and sends an OTP.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid input, taken emails, resend cooldowns,
    /// and delivery failures.
    pub fn register(&self, request: &RegisterRequest) -> Result<RegistrationView, ApiError> {
        let name = present(request.name.as_deref());
        let email = present(request.email.as_deref());
        let password = request.password.as_deref().filter(|password| !password.is_empty());
        require_fields(&[
            ("name", name.is_some()),
            ("email", email.is_some()),
            ("password", password.is_some()),
        ])?;
        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let name = validate_name(name)?;
        let email = normalize_email(email)?;
        validate_password(password)?;
        let phone = present(request.phone.as_deref()).map(validate_phone).transpose()?;
        if self.store.credentials_by_email(&email)?.is_some() {
            return Err(ApiError::conflict("Email already registered"));
        }
        let now = self.now();
        if let Some(existing) = self.store.pending_registration(&email)? {
            self.otp.reissue(&existing, now)?;
        }
        let password_hash = self.passwords.hash(password);
        let pending = self.otp.issue(email.clone(), name, phone, password_hash, now);
        self.store.save_pending_registration(&pending)?;
        self.record(&AccountAuditEvent::for_email("registration_started", &email, None));
        if self.send_code(&pending).is_err() {
            self.store.delete_pending_registration(&email)?;
            return Err(ApiError::internal());
        }
        self.record(&AccountAuditEvent::for_email("otp_issued", &email, None));
        Ok(RegistrationView {
            email,
            expires_at: pending.expires_at,
        })
    }

    /// Verifies an OTP and creates the user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for missing, expired, or wrong codes, and when
    /// the email was registered meanwhile.
    pub fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<User, ApiError> {
        let email = present(request.email.as_deref());
        let code = present(request.otp.as_deref());
        require_fields(&[("email", email.is_some()), ("otp", code.is_some())])?;
        let (Some(email), Some(code)) = (email, code) else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let email = normalize_email(email).map_err(|_| ApiError::validation(INVALID_OTP))?;
        let now = self.now();
        match self.store.verify_pending_registration(&email, code, &self.otp, now)? {
            OtpVerification::Registered(user) => {
                self.record(&AccountAuditEvent::for_user("otp_verified", user.id.get(), None));
                Ok(user)
            }
            OtpVerification::NoPending => {
                let reason = Some("no_pending");
                self.record(&AccountAuditEvent::for_email("otp_rejected", &email, reason));
                Err(ApiError::validation(INVALID_OTP))
            }
            OtpVerification::Expired => {
                self.record(&AccountAuditEvent::for_email("otp_rejected", &email, Some("expired")));
                Err(ApiError::validation("OTP has expired"))
            }
            OtpVerification::Mismatch {
                ..
            } => {
                let reason = Some("mismatch");
                self.record(&AccountAuditEvent::for_email("otp_rejected", &email, reason));
                Err(ApiError::validation(INVALID_OTP))
            }
            OtpVerification::Exhausted => {
                self.record(&AccountAuditEvent::for_email(
                    "otp_rejected",
                    &email,
                    Some("attempts_exhausted"),
                ));
                Err(ApiError::validation("Too many failed attempts"))
            }
        }
    }

    /// Sends a fresh OTP for a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] without a pending registration, inside the
    /// cooldown window, or when delivery fails.
    pub fn resend_otp(&self, request: &ResendOtpRequest) -> Result<RegistrationView, ApiError> {
        let email = present(request.email.as_deref());
        require_fields(&[("email", email.is_some())])?;
        let Some(email) = email else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let email = normalize_email(email)?;
        let previous = self
            .store
            .pending_registration(&email)?
            .ok_or_else(|| ApiError::not_found("No pending registration found"))?;
        let pending = self.otp.reissue(&previous, self.now())?;
        self.store.save_pending_registration(&pending)?;
        if self.send_code(&pending).is_err() {
            self.store.save_pending_registration(&previous)?;
            return Err(ApiError::internal());
        }
        self.record(&AccountAuditEvent::for_email("otp_resent", &email, None));
        Ok(RegistrationView {
            email,
            expires_at: pending.expires_at,
        })
    }

    /// Exchanges credentials for a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 401 for any credential mismatch.
    pub fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        let email = present(request.email.as_deref());
        let password = request.password.as_deref().filter(|password| !password.is_empty());
        require_fields(&[("email", email.is_some()), ("password", password.is_some())])?;
        let (Some(email), Some(password)) = (email, password) else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let email = email.to_ascii_lowercase();
        let credentials = match normalize_email(&email) {
            Ok(normalized) => self.store.credentials_by_email(&normalized)?,
            Err(_) => None,
        };
        let Some(credentials) = credentials else {
            self.passwords.dummy_verify(password);
            self.record(&AccountAuditEvent::for_email("login_failed", &email, Some("unknown")));
            return Err(ApiError::unauthenticated(LOGIN_FAILED));
        };
        let verified = self
            .passwords
            .verify(password, &credentials.password_hash)
            .map_err(|_| ApiError::internal())?;
        if !verified {
            self.record(&AccountAuditEvent::for_user(
                "login_failed",
                credentials.user.id.get(),
                Some("bad_password"),
            ));
            return Err(ApiError::unauthenticated(LOGIN_FAILED));
        }
        let user = credentials.user;
        let now = self.now();
        let access = self
            .tokens
            .issue(TokenKind::Access, user.id, &user.email, now)
            .map_err(|_| ApiError::internal())?;
        let refresh = self
            .tokens
            .issue(TokenKind::Refresh, user.id, &user.email, now)
            .map_err(|_| ApiError::internal())?;
        self.record(&AccountAuditEvent::for_user("login_succeeded", user.id.get(), None));
        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: access.expires_in,
        })
    }

    /// Issues a new access token from a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 401 for invalid, expired, or revoked
    /// refresh tokens.
    pub fn refresh(&self, request: &RefreshRequest) -> Result<AccessToken, ApiError> {
        let token = present(request.refresh_token.as_deref());
        require_fields(&[("refresh_token", token.is_some())])?;
        let Some(token) = token else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let now = self.now();
        let claims = self.tokens.verify(token, TokenKind::Refresh, now).map_err(token_error)?;
        if self.store.is_token_revoked(&claims.jti, now)? {
            return Err(token_error(TokenError::Malformed));
        }
        let user_id = claims.user_id().map_err(token_error)?;
        let user = self
            .store
            .user_by_id(user_id)?
            .ok_or_else(|| token_error(TokenError::Malformed))?;
        let access = self
            .tokens
            .issue(TokenKind::Access, user.id, &user.email, now)
            .map_err(|_| ApiError::internal())?;
        self.record(&AccountAuditEvent::for_user("token_refreshed", user.id.get(), None));
        Ok(AccessToken {
            access_token: access.token,
            token_type: "Bearer",
            expires_in: access.expires_in,
        })
    }

    /// Revokes the caller's refresh token when one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the refresh token is invalid or belongs to
    /// another user.
    pub fn logout(&self, caller: UserId, request: &RefreshRequest) -> Result<(), ApiError> {
        if let Some(token) = present(request.refresh_token.as_deref()) {
            let now = self.now();
            match self.tokens.verify(token, TokenKind::Refresh, now) {
                Ok(claims) => {
                    if claims.user_id().map_err(token_error)? != caller {
                        return Err(ApiError::forbidden(
                            "Refresh token does not belong to the caller",
                        ));
                    }
                    self.store.revoke_token(&claims.jti, claims.expires_at())?;
                }
                Err(TokenError::Expired) => {}
                Err(err) => return Err(token_error(err)),
            }
        }
        self.record(&AccountAuditEvent::for_user("logout", caller.get(), None));
        Ok(())
    }

    /// Returns the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the user no longer exists.
    pub fn me(&self, caller: UserId) -> Result<User, ApiError> {
        self.store.user_by_id(caller)?.ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Returns another user's public profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the user does not exist.
    pub fn public_profile(&self, id: UserId) -> Result<PublicProfile, ApiError> {
        self.store
            .user_by_id(id)?
            .map(|user| PublicProfile::from(&user))
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Applies a profile update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for empty or invalid updates.
    pub fn update_me(
        &self,
        caller: UserId,
        request: &UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        let patch = UserPatch {
            name: request.name.as_deref().map(validate_name).transpose()?,
            phone: request.phone.as_deref().map(validate_phone).transpose()?,
            address: request.address.as_deref().map(validate_address).transpose()?,
            profile_photo_url: request
                .profile_photo_url
                .as_deref()
                .map(|url| validate_http_url("profile_photo_url", url))
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(ApiError::validation(NO_INPUT_MESSAGE));
        }
        Ok(self.store.update_user(caller, &patch, self.now())?)
    }

    /// Delivers the current code of a pending registration.
    fn send_code(&self, pending: &PendingRegistration) -> Result<(), ApiError> {
        let message = OtpMessage {
            from: self.sender.clone(),
            to: pending.email.clone(),
            name: pending.name.clone(),
            subject: OTP_SUBJECT.to_string(),
            code: pending.code.clone(),
            expires_at: pending.expires_at,
        };
        self.notifier.deliver(&message).map_err(|_| {
            self.record(&AccountAuditEvent::for_email(
                "otp_delivery_failed",
                &pending.email,
                None,
            ));
            ApiError::internal()
        })
    }
}

/// Maps token failures to 401 responses.
pub(crate) fn token_error(err: TokenError) -> ApiError {
    ApiError::unauthenticated(err.to_string())
}
