use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::providers::{self, ChatError};

pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChatError>> + 'a>>;

/// One chat completion attempt per call, no retries.
pub trait ChatGateway {
    fn chat<'a>(&'a self, prompt: &'a str) -> ChatFuture<'a>;
}

pub struct HostChatGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> HostChatGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl ChatGateway for HostChatGateway<'_> {
    fn chat<'a>(&'a self, prompt: &'a str) -> ChatFuture<'a> {
        Box::pin(providers::deepseek::chat(self.client, self.cfg, prompt))
    }
}
