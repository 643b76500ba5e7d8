//! Typed model of the Google identity surface used by the sign-in flow.
//!
//! The browser page loads the Google platform library from a `<script>`
//! tag, so none of this exists at compile time. The traits here are the
//! seam: the sign-in glue in [`crate::signin`] is written against them,
//! and tests drive it with fakes. The shapes follow the externs file that
//! production builds verify scripts against.

/// Root global declared by the platform library externs.
pub const EXTERN_ROOT: &str = "gapi";

/// Token material returned after a successful sign-in.
///
/// `id_token` is the only field the sign-in form consumes. The rest ride
/// along because the platform hands back the whole response object.
#[derive(Debug, Clone, Default)]
pub struct AuthResponse {
    pub access_token: String,
    pub id_token: String,
    pub login_hint: String,
    pub scope: String,
    pub expires_in: u64,
    pub first_issued_at: u64,
    pub expires_at: u64,
}

/// Public profile fields of a signed-in account.
#[derive(Debug, Clone, Default)]
pub struct BasicProfile {
    pub id: String,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub image_url: String,
    pub email: String,
}

/// A user the platform reports as signed in.
pub trait SignedInUser {
    fn id(&self) -> String;
    fn is_signed_in(&self) -> bool;
    fn basic_profile(&self) -> BasicProfile;
    fn auth_response(&self) -> AuthResponse;
}

/// The page-wide auth instance (`gapi.auth2.getAuthInstance()`).
pub trait AuthInstance {
    /// Terminate the platform session for the current user.
    ///
    /// The server session is what keeps the user logged in, so the glue
    /// signs out of the platform immediately after lifting the token.
    fn sign_out(&self);
}

/// Whether `name` is a global the browser platform itself provides.
///
/// Semantic analysis treats every global reference as unresolved, so the
/// verifier needs to know which names need no externs entry. This covers
/// the ECMAScript builtins plus the DOM globals page scripts reach for.
pub fn is_platform_builtin(name: &str) -> bool {
    matches!(
        name,
        // ECMAScript
        "Array"
            | "ArrayBuffer"
            | "BigInt"
            | "Boolean"
            | "DataView"
            | "Date"
            | "Error"
            | "EvalError"
            | "Function"
            | "Infinity"
            | "JSON"
            | "Map"
            | "Math"
            | "NaN"
            | "Number"
            | "Object"
            | "Promise"
            | "Proxy"
            | "RangeError"
            | "ReferenceError"
            | "Reflect"
            | "RegExp"
            | "Set"
            | "String"
            | "Symbol"
            | "SyntaxError"
            | "TypeError"
            | "URIError"
            | "WeakMap"
            | "WeakSet"
            | "decodeURI"
            | "decodeURIComponent"
            | "encodeURI"
            | "encodeURIComponent"
            | "globalThis"
            | "isFinite"
            | "isNaN"
            | "parseFloat"
            | "parseInt"
            | "undefined"
            // DOM and BOM
            | "window"
            | "document"
            | "console"
            | "navigator"
            | "location"
            | "history"
            | "screen"
            | "localStorage"
            | "sessionStorage"
            | "alert"
            | "confirm"
            | "prompt"
            | "fetch"
            | "XMLHttpRequest"
            | "FormData"
            | "URL"
            | "URLSearchParams"
            | "Blob"
            | "File"
            | "FileReader"
            | "Event"
            | "CustomEvent"
            | "Element"
            | "HTMLElement"
            | "Node"
            | "NodeList"
            | "MutationObserver"
            | "setTimeout"
            | "setInterval"
            | "clearTimeout"
            | "clearInterval"
            | "requestAnimationFrame"
            | "cancelAnimationFrame"
            | "atob"
            | "btoa"
    )
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_builtins() {
        assert!(is_platform_builtin("document"));
        assert!(is_platform_builtin("JSON"));
        assert!(is_platform_builtin("setTimeout"));
    }

    #[test]
    fn test_platform_does_not_cover_vendor_globals() {
        // Vendor libraries must come in through externs files instead
        assert!(!is_platform_builtin(EXTERN_ROOT));
        assert!(!is_platform_builtin("jQuery"));
        assert!(!is_platform_builtin("ga"));
    }

    #[test]
    fn test_auth_response_default_is_empty() {
        let response = AuthResponse::default();
        assert!(response.id_token.is_empty());
        assert_eq!(response.expires_in, 0);
    }
}
