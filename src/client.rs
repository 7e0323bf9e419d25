use std::time::Duration;

use url::Url;

use crate::util::{Error, Result};

#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub user_agent: Option<String>,
  pub timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: None,
      timeout: Duration::from_secs(10),
    }
  }
}

impl ClientConfig {
  fn to_builder(&self) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder();

    if let Some(user_agent) = &self.user_agent {
      builder = builder.user_agent(user_agent);
    } else {
      builder = builder.user_agent(crate::util::USER_AGENT);
    }

    builder.timeout(self.timeout)
  }

  pub fn build(&self) -> Result<Client> {
    let reqwest_client = self.to_builder().build()?;
    Ok(Client {
      client: reqwest_client,
    })
  }
}

pub struct Client {
  client: reqwest::Client,
}

impl Client {
  pub async fn get(&self, url: &Url) -> Result<Response> {
    let resp = self.client.get(url.clone()).send().await?;
    Response::from_reqwest_resp(resp).await
  }
}

/// A fully buffered response body, decoupled from the reqwest types.
pub struct Response {
  url: Url,
  status: reqwest::StatusCode,
  body: Box<[u8]>,
}

impl Response {
  async fn from_reqwest_resp(resp: reqwest::Response) -> Result<Self> {
    let status = resp.status();
    let url = resp.url().clone();
    let body = resp.bytes().await?.to_vec().into_boxed_slice();

    Ok(Self { url, status, body })
  }

  pub fn error_for_status(self) -> Result<Self> {
    if self.status.is_client_error() || self.status.is_server_error() {
      return Err(Error::HttpStatus(self.status, self.url));
    }

    Ok(self)
  }

  pub fn status(&self) -> reqwest::StatusCode {
    self.status
  }

  pub fn body(&self) -> &[u8] {
    &self.body
  }

  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}
