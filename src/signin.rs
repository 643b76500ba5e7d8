//! Browser-side glue for Google sign-in and the avatar picker.
//!
//! The login template renders a hidden form that posts the Google ID token
//! back to the server, and profile pages render avatar upload pickers next
//! to an "upload" radio button. This module is that page logic, written
//! against the [`Dom`] seam so tests can drive it with a fake page.

use crate::identity::{AuthInstance, SignedInUser};
use crate::log;
use thiserror::Error;

/// Id of the hidden form the login template renders.
pub const SIGNIN_FORM_ID: &str = "form-glogin";

/// Name of the input that carries the ID token to the server.
pub const TOKEN_INPUT_NAME: &str = "google_id_token";

/// Class marking avatar file pickers.
pub const AVATAR_PICKER_CLASS: &str = "avatar-image-upload";

/// Name of the avatar source radio group.
pub const AVATAR_SOURCE_RADIO: &str = "avatar_from";

/// Radio value meaning "use the uploaded file".
pub const AVATAR_SOURCE_UPLOAD: &str = "upload";

/// Opaque handle to a page element.
pub type ElementId = usize;

/// The slice of the DOM the glue needs.
pub trait Dom {
    fn form_by_id(&self, id: &str) -> Option<ElementId>;
    fn input_by_name(&self, form: ElementId, name: &str) -> Option<ElementId>;
    fn value(&self, element: ElementId) -> String;
    fn set_value(&mut self, element: ElementId, value: &str);
    fn submit(&mut self, form: ElementId);
    fn file_inputs_with_class(&self, class: &str) -> Vec<ElementId>;
    fn enclosing_form(&self, element: ElementId) -> Option<ElementId>;
    fn radio_by_name_value(&self, form: ElementId, name: &str, value: &str) -> Option<ElementId>;
    fn set_checked(&mut self, element: ElementId, checked: bool);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlueError {
    #[error("sign-in form '#{0}' not found in page")]
    MissingForm(&'static str),
    #[error("input '{0}' not found in sign-in form")]
    MissingInput(&'static str),
}

/// Handle a successful Google sign-in.
///
/// Lifts the ID token out of the auth response into the hidden form,
/// signs out of the platform session, then submits the form. Sign-out
/// happens before submit: the server session is what keeps the user
/// logged in, and a lingering platform session would auto-reauth them
/// after they log out.
pub fn on_sign_in_success(
    dom: &mut impl Dom,
    auth: &impl AuthInstance,
    user: &impl SignedInUser,
) -> Result<(), GlueError> {
    let form = dom
        .form_by_id(SIGNIN_FORM_ID)
        .ok_or(GlueError::MissingForm(SIGNIN_FORM_ID))?;
    let input = dom
        .input_by_name(form, TOKEN_INPUT_NAME)
        .ok_or(GlueError::MissingInput(TOKEN_INPUT_NAME))?;

    dom.set_value(input, &user.auth_response().id_token);
    auth.sign_out();
    dom.submit(form);
    Ok(())
}

/// Handle a failed Google sign-in. The page stays on the login form.
pub fn on_sign_in_failure(reason: &str) {
    log!("warning"; "google sign-in failed: {}", reason);
}

/// Select the "upload" avatar source wherever a file has been picked.
///
/// Checks every avatar picker on the page; each one holding a file gets
/// the "upload" radio in its form checked. Returns how many radios were
/// checked. Pickers outside a form or without a matching radio group are
/// skipped.
pub fn sync_avatar_pickers(dom: &mut impl Dom) -> usize {
    let mut synced = 0;
    for picker in dom.file_inputs_with_class(AVATAR_PICKER_CLASS) {
        if dom.value(picker).is_empty() {
            continue;
        }
        let Some(form) = dom.enclosing_form(picker) else {
            continue;
        };
        if let Some(radio) = dom.radio_by_name_value(form, AVATAR_SOURCE_RADIO, AVATAR_SOURCE_UPLOAD)
        {
            dom.set_checked(radio, true);
            synced += 1;
        }
    }
    synced
}

// ============================================================================
// tests
// ============================================================================
