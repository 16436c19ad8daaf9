//! Session-workspace download URLs for zip exports.
//!
//! The zip archive lands in the user's session workspace on the data store
//! server. The DSS base is located the way the viewers located it: take a
//! data-set upload URL, cut it at the store-share upload path, and append
//! the session-workspace download servlet with the session token and file
//! path as query parameters.

use url::Url;

const UPLOAD_MARKER: &str = "/datastore_server/store_share_file_upload";
const DOWNLOAD_PATH: &str = "/datastore_server/session_workspace_file_download";

/// Derive the download URL for `file_path` from a DSS upload URL. Returns
/// `None` when the upload URL does not contain the store-share marker.
pub fn session_download_url(
    upload_url: &str,
    session_token: &str,
    file_path: &str,
) -> Option<String> {
    let idx = upload_url.find(UPLOAD_MARKER)?;
    let base = &upload_url[..idx];
    let mut url = Url::parse(&format!("{base}{DOWNLOAD_PATH}")).ok()?;
    url.query_pairs_mut()
        .append_pair("sessionID", session_token)
        .append_pair("filePath", file_path);
    Some(url.into())
}
