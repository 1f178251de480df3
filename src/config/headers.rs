//! HTTP header and URL parameter name constants.
//!
//! Header names used by the CORS probe and the Instagram JSON API, and the
//! query parameter names the vulnerability checks look for.

// CORS headers
/// Access-Control-Allow-Origin response header
pub const HEADER_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// Access-Control-Allow-Credentials response header
pub const HEADER_ACCESS_CONTROL_ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
/// Origin request header
pub const HEADER_ORIGIN: &str = "Origin";

// Platform request headers
/// Guest token header for the X REST API
pub const HEADER_X_GUEST_TOKEN: &str = "x-guest-token";
/// App id header expected by the Instagram web API
pub const HEADER_X_IG_APP_ID: &str = "X-IG-App-ID";
/// Instagram web app id (public, embedded in the web client)
pub const INSTAGRAM_WEB_APP_ID: &str = "936619743392459";

/// Query parameters that carry signatures, access tokens or expiry markers.
///
/// Matched case-insensitively. `oh`/`oe` are the Meta CDN hash and expiry.
pub const TOKEN_QUERY_PARAMS: &[&str] = &[
    "token",
    "access_token",
    "auth",
    "sig",
    "signature",
    "hash",
    "key",
    "oh",
    "oe",
    "expires",
    "exp",
    "policy",
    "x-amz-signature",
    "x-amz-credential",
    "x-amz-security-token",
];

/// Query parameters that expose CDN-internal routing or encoding identifiers.
pub const INTERNAL_ID_QUERY_PARAMS: &[&str] = &[
    "_nc_ht", "_nc_cat", "_nc_ohc", "_nc_oc", "_nc_gid", "_nc_sid", "_nc_zt", "efg", "ccb", "vs",
    "edm",
];

/// Minimum length of an all-digit path segment treated as an internal id
pub const INTERNAL_NUMERIC_ID_MIN_DIGITS: usize = 15;
