//! Demo accounts and the logged-in profile.
//!
//! Credentials are compared in plain text against the locally stored account
//! list. This is a demo login, not an authentication system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::constants::DEFAULT_AVATAR_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Ngo,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Donor => "donor",
            UserRole::Ngo => "ngo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub avatar: String,
    /// Phone number shown to the other party of a claim
    pub contact: String,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            avatar: DEFAULT_AVATAR_URL.to_string(),
            contact: String::new(),
        }
    }

    pub fn has_contact(&self) -> bool {
        !self.contact.trim().is_empty()
    }

    /// Merges the non-empty fields of an update
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            email,
            phone,
            avatar,
            contact,
        } = update;
        if let Some(name) = name.filter(|v| !v.is_empty()) {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = Some(email);
        }
        if let Some(phone) = phone {
            self.phone = Some(phone);
        }
        if let Some(avatar) = avatar.filter(|v| !v.is_empty()) {
            self.avatar = avatar;
        }
        if let Some(contact) = contact {
            self.contact = contact;
        }
    }
}

/// Partial profile edit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub contact: Option<String>,
}

impl ProfileUpdate {
    pub fn contact(contact: impl Into<String>) -> Self {
        Self {
            contact: Some(contact.into()),
            ..Self::default()
        }
    }
}

/// Stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    Email {
        email: String,
        password: String,
        #[serde(default)]
        phone: Option<String>,
    },
    Phone {
        phone: String,
        password: String,
    },
    Google,
    Facebook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("This email is already registered. Please log in.")]
    EmailTaken,

    #[error("Account not found. Please sign up first.")]
    AccountNotFound,

    #[error("This phone number is already registered. Please log in.")]
    PhoneTaken,

    #[error("Phone number not registered. Please sign up first.")]
    PhoneNotRegistered,

    #[error("Incorrect password.")]
    IncorrectPassword,
}

fn new_user_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("user_{}", &id[..9])
}

/// Resolves a login or registration into a profile
///
/// Registration appends to `users`. Google and Facebook use fixed demo
/// identities so their history survives a logout.
pub fn authenticate(
    users: &mut Vec<RegisteredUser>,
    method: &AuthMethod,
    mode: AuthMode,
) -> Result<UserProfile, AuthError> {
    match method {
        AuthMethod::Email {
            email,
            password,
            phone,
        } => {
            let default_name = email.split('@').next().unwrap_or_default().to_string();
            let (id, name) = match mode {
                AuthMode::Register => {
                    if users.iter().any(|u| u.email.as_deref() == Some(email.as_str())) {
                        return Err(AuthError::EmailTaken);
                    }
                    let user = RegisteredUser {
                        id: new_user_id(),
                        name: default_name,
                        email: Some(email.clone()),
                        phone: phone.clone(),
                        password: password.clone(),
                    };
                    let ids = (user.id.clone(), user.name.clone());
                    users.push(user);
                    ids
                }
                AuthMode::Login => {
                    let user = users
                        .iter()
                        .find(|u| u.email.as_deref() == Some(email.as_str()))
                        .ok_or(AuthError::AccountNotFound)?;
                    if user.password != *password {
                        return Err(AuthError::IncorrectPassword);
                    }
                    (user.id.clone(), user.name.clone())
                }
            };
            let stored_phone = users
                .iter()
                .find(|u| u.id == id)
                .and_then(|u| u.phone.clone());

            let mut profile = UserProfile::new(id, name);
            profile.email = Some(email.clone());
            profile.contact = phone.clone().or(stored_phone).unwrap_or_default();
            Ok(profile)
        }
        AuthMethod::Phone { phone, password } => {
            let (id, name) = match mode {
                AuthMode::Register => {
                    if users.iter().any(|u| u.phone.as_deref() == Some(phone.as_str())) {
                        return Err(AuthError::PhoneTaken);
                    }
                    let user = RegisteredUser {
                        id: new_user_id(),
                        name: "Mobile User".to_string(),
                        email: None,
                        phone: Some(phone.clone()),
                        password: password.clone(),
                    };
                    let ids = (user.id.clone(), user.name.clone());
                    users.push(user);
                    ids
                }
                AuthMode::Login => {
                    let user = users
                        .iter()
                        .find(|u| u.phone.as_deref() == Some(phone.as_str()))
                        .ok_or(AuthError::PhoneNotRegistered)?;
                    if user.password != *password {
                        return Err(AuthError::IncorrectPassword);
                    }
                    (user.id.clone(), user.name.clone())
                }
            };

            let mut profile = UserProfile::new(id, name);
            profile.phone = Some(phone.clone());
            profile.contact = phone.clone();
            Ok(profile)
        }
        AuthMethod::Google => {
            let mut profile = UserProfile::new("user_google_demo", "Google User");
            profile.email = Some("user@gmail.com".to_string());
            Ok(profile)
        }
        AuthMethod::Facebook => Ok(UserProfile::new("user_fb_demo", "Facebook User")),
    }
}
