use reqwest::Client;

#[derive(Clone, Debug, PartialEq)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE { url: String },
}
impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }
    /// An image attachment. `url` may be an `http(s)://` URL or a
    /// `data:<mime>;base64,<payload>` URI; both are forwarded untouched.
    pub fn image(url: impl Into<String>) -> Self {
        LLMMessageType::IMAGE { url: url.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LLMUserType {
    Human,
    AI,
    System,
}
impl LLMUserType {
    pub fn as_openai_role(&self) -> &'static str {
        match self {
            LLMUserType::Human => "user",
            LLMUserType::AI => "assistant",
            LLMUserType::System => "system",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub role: LLMUserType,
    pub content: Vec<LLMMessageType>,
}

impl LLMMessage {
    pub fn user(content: Vec<LLMMessageType>) -> Self {
        Self {
            role: LLMUserType::Human,
            content,
        }
    }
}

#[derive(Clone)]
pub struct LLMClient {
    pub(crate) http: Client,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
}

impl LLMClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    /// Reuse an existing connection pool instead of the one created by `new`.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

impl std::fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMClient")
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}
