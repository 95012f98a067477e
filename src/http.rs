use gloo::net::http::{Method, Request};
use gloo::net::Error;
use serde::Serialize;
use web_sys::RequestCache;

pub(crate) async fn post_json<T: Serialize>(url: &str, body: &T) -> Result<(), Error> {
    let response = Request::post(url)
        .header("Accept", "application/json")
        .json(body)?
        .send()
        .await?;
    if !response.ok() {
        return Err(Error::GlooError(format!(
            "{url} answered {}",
            response.status()
        )));
    }
    Ok(())
}

/// `HEAD` with the cache bypassed; returns the `ETag` and `Last-Modified` headers.
pub(crate) async fn head_validators(url: &str) -> Result<(Option<String>, Option<String>), Error> {
    let response = Request::get(url)
        .method(Method::HEAD)
        .cache(RequestCache::NoCache)
        .send()
        .await?;
    let headers = response.headers();
    Ok((headers.get("etag"), headers.get("last-modified")))
}
