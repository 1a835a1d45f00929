//! Account signup and login forms.

use validator::Validate;

use crate::forms::{Form, FormModel};
use crate::models::{LoginRequest, SignupRequest};

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SignupFormValues {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FormModel for SignupFormValues {
    type Output = SignupRequest;

    fn to_output(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub type SignupForm = Form<SignupFormValues>;

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct LoginFormValues {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FormModel for LoginFormValues {
    type Output = LoginRequest;

    fn to_output(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub type LoginForm = Form<LoginFormValues>;
