use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::model::{ChatError, Message};
use crate::providers;

pub struct ModelGatewayRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGatewayResponse {
    pub content: String,
}

pub type ModelGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ModelGatewayResponse, ChatError>> + 'a>>;

/// Sends one chat request and returns the reply text.
pub trait ModelGateway {
    fn chat<'a>(&'a self, request: ModelGatewayRequest) -> ModelGatewayFuture<'a>;
}

impl<G: ModelGateway + ?Sized> ModelGateway for &G {
    fn chat<'a>(&'a self, request: ModelGatewayRequest) -> ModelGatewayFuture<'a> {
        (**self).chat(request)
    }
}

pub struct DeepSeekGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> DeepSeekGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl ModelGateway for DeepSeekGateway<'_> {
    fn chat<'b>(&'b self, request: ModelGatewayRequest) -> ModelGatewayFuture<'b> {
        Box::pin(async move {
            let content =
                providers::deepseek::chat(self.client, self.cfg, &request.messages).await?;
            Ok(ModelGatewayResponse { content })
        })
    }
}
