use crate::domain::models::PutPolicy;

/// Port for the provider's credential holder.
///
/// The facade only asks for tokens and signed URLs. Management adapters also
/// use it to sign their own requests.
pub trait Auth: Send + Sync + 'static {
    /// Access key of the credential pair
    fn access_key(&self) -> &str;

    /// Sign an upload token for `bucket` (or `bucket:key`) valid for `expires` seconds
    fn upload_token(
        &self,
        bucket: &str,
        key: Option<&str>,
        expires: u64,
        policy: Option<&PutPolicy>,
        strict_policy: bool,
    ) -> String;

    /// Turn a private object URL into a time-limited signed URL
    fn private_download_url(&self, base_url: &str, expires: u64) -> String;

    /// `Authorization` header value for a management request.
    ///
    /// `form_body` is the url-encoded body, which is covered by the signature.
    fn authorization(&self, path_and_query: &str, form_body: Option<&[u8]>) -> String;
}
