pub mod client;
pub mod media;
pub mod response;
pub mod types;

pub use client::GeminiHttpClient;
pub use media::GeminiMediaClient;
pub use response::{normalize, ResponsePart, NO_CONTENT_MESSAGE};

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path_regex};
    use wiremock::MockBuilder;

    pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";
    pub const PREDICT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:predict$";

    pub fn post_path_regex(pattern: &str) -> MockBuilder {
        wiremock::Mock::given(method("POST")).and(path_regex(pattern))
    }
}
