//! Profile view model.
//!
//! Holds the editable draft of the signed-in user's profile, drives the
//! action handlers, and produces a [`ProfileRender`] snapshot for whatever
//! draws the page. It has no markup of its own.

use crate::actions::SessionActions;
use crate::error::{ClientError, Result};
use crate::listings::{self, OwnedListings};
use crate::navigation::Navigator;
use estate_core::{Identity, ListingId, ListingSummary, UpdateUserRequest, UserId};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

pub const UPDATE_SUCCESS_NOTICE: &str = "User is updated successfully!";
pub const LISTINGS_ERROR_NOTICE: &str = "Error showing listings";

/// Editable fields of the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Username,
    Email,
    Avatar,
    Password,
}

/// Local, unsaved copy of the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftProfile {
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub password: String,
}

impl DraftProfile {
    /// Seed the form from the identity. The password always starts empty.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            avatar: identity.avatar.clone(),
            password: String::new(),
        }
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProfileField::Username => self.username = value,
            ProfileField::Email => self.email = value,
            ProfileField::Avatar => self.avatar = value,
            ProfileField::Password => self.password = value,
        }
    }

    /// Request body for the update endpoint.
    ///
    /// Blank fields are left out so the server keeps its stored values; an
    /// empty password in particular never reaches the server.
    pub fn to_update_request(&self) -> UpdateUserRequest {
        fn non_blank(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        UpdateUserRequest {
            username: non_blank(&self.username),
            email: non_blank(&self.email),
            avatar: non_blank(&self.avatar),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}

/// Progress of the avatar upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarUploadStatus {
    #[default]
    Idle,
    Uploading(u8),
    Done,
    Failed,
}

impl AvatarUploadStatus {
    /// Status line under the avatar, if any.
    pub fn status_line(self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Uploading(percent) => Some(format!("Uploading {}%", percent.min(100))),
            Self::Done => Some("Image Successfully Uploaded".to_string()),
            Self::Failed => {
                Some("Error Image Upload (image size must be less than 10MB)".to_string())
            }
        }
    }
}

/// Everything the profile page shows, at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRender {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
    pub pending: bool,
    /// "Loading..." while a mutation is in flight, "Update" otherwise.
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
    pub upload_status: Option<String>,
    pub listings: Vec<ListingSummary>,
    pub listings_error: Option<&'static str>,
}

#[derive(Debug)]
struct FormState {
    draft: DraftProfile,
    update_success: bool,
}

/// View model of the profile page for the signed-in user.
pub struct ProfileView<N> {
    actions: Arc<SessionActions<N>>,
    user_id: UserId,
    form: Arc<RwLock<FormState>>,
    listings: Arc<RwLock<OwnedListings>>,
    upload: watch::Sender<AvatarUploadStatus>,
}

impl<N: Navigator> ProfileView<N> {
    /// Mount the view for whoever is signed in.
    pub fn mount(actions: Arc<SessionActions<N>>) -> Result<Self> {
        let identity = actions
            .session()
            .current_identity()
            .ok_or(ClientError::Unauthenticated)?;

        let (upload, _) = watch::channel(AvatarUploadStatus::Idle);

        Ok(Self {
            user_id: identity.id.clone(),
            form: Arc::new(RwLock::new(FormState {
                draft: DraftProfile::from_identity(&identity),
                update_success: false,
            })),
            listings: Arc::new(RwLock::new(OwnedListings::default())),
            upload,
            actions,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub async fn draft(&self) -> DraftProfile {
        self.form.read().await.draft.clone()
    }

    pub async fn set_field(&self, field: ProfileField, value: impl Into<String>) {
        self.form.write().await.draft.set(field, value);
    }

    /// Submit the draft. Errors are also recorded in the session store.
    pub async fn submit(&self) -> Result<Identity> {
        let draft = {
            let mut form = self.form.write().await;
            form.update_success = false;
            form.draft.clone()
        };

        let identity = self.actions.update_identity(&self.user_id, &draft).await?;

        self.form.write().await.update_success = true;
        info!(user_id = %self.user_id, "Profile updated");
        Ok(identity)
    }

    pub async fn delete_account(&self) -> Result<()> {
        self.actions.delete_identity(&self.user_id).await
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.actions.sign_out().await
    }

    /// Load the user's listings into the view.
    pub async fn show_listings(&self) -> Result<()> {
        listings::fetch_owned_listings(
            self.actions.client(),
            &self.user_id,
            Arc::downgrade(&self.listings),
        )
        .await
    }

    pub async fn delete_listing(&self, id: &ListingId) -> Result<()> {
        listings::delete_listing(self.actions.client(), id, Arc::downgrade(&self.listings)).await
    }

    /// Upload a new avatar image and put its URL into the draft.
    ///
    /// The draft is not submitted; the user still has to press "Update".
    pub async fn upload_avatar<F>(&self, file_path: &Path, mut progress: F) -> Result<String>
    where
        F: FnMut(u8),
    {
        let media = self.actions.client().media()?;
        self.upload.send_replace(AvatarUploadStatus::Uploading(0));

        let uploaded = media
            .upload_image(file_path, |percent| {
                self.upload
                    .send_replace(AvatarUploadStatus::Uploading(percent));
                progress(percent);
            })
            .await;

        match uploaded {
            Ok(image) => {
                self.upload.send_replace(AvatarUploadStatus::Done);
                self.form.write().await.draft.avatar = image.secure_url.clone();
                Ok(image.secure_url)
            }
            Err(err) => {
                warn!(file = %file_path.display(), error = %err, "Avatar upload failed");
                self.upload.send_replace(AvatarUploadStatus::Failed);
                Err(err)
            }
        }
    }

    pub fn upload_status(&self) -> AvatarUploadStatus {
        *self.upload.borrow()
    }

    pub async fn render(&self) -> ProfileRender {
        let session = self.actions.session().snapshot();
        let form = self.form.read().await;
        let listings = self.listings.read().await;

        ProfileRender {
            username: form.draft.username.clone(),
            email: form.draft.email.clone(),
            password: form.draft.password.clone(),
            avatar: if form.draft.avatar.is_empty() {
                session
                    .current_identity
                    .as_ref()
                    .map(|identity| identity.avatar.clone())
                    .unwrap_or_default()
            } else {
                form.draft.avatar.clone()
            },
            pending: session.pending,
            submit_label: if session.pending { "Loading..." } else { "Update" },
            error: session.last_error.clone(),
            notice: form.update_success.then_some(UPDATE_SUCCESS_NOTICE),
            upload_status: self.upload_status().status_line(),
            listings: listings.items.clone(),
            listings_error: listings.error.then_some(LISTINGS_ERROR_NOTICE),
        }
    }
}
