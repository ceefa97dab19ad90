mod blog;
mod email;

pub use blog::{
    BlogGateway, BlogPublishError, PostStatus, PublishedPost, WordPressClient, WordPressSettings,
};
pub use email::{EmailDeliveryError, EmailGateway, SmtpMailer, SmtpSettings};

use crate::config::{resolve_credential, ConfigError, NotifierConfig};

#[derive(Debug, thiserror::Error)]
pub enum NotifierSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Email(#[from] EmailDeliveryError),
    #[error(transparent)]
    Blog(#[from] BlogPublishError),
}

/// Outbound channels for a promotion: one email recipient and one blog.
#[derive(Debug)]
pub struct Notifier {
    email: Box<dyn EmailGateway>,
    blog: Box<dyn BlogGateway>,
}

impl Notifier {
    pub fn new(email: Box<dyn EmailGateway>, blog: Box<dyn BlogGateway>) -> Self {
        Self { email, blog }
    }

    /// Resolves both credential references and builds the SMTP and
    /// WordPress clients.
    pub fn from_config(config: &NotifierConfig) -> Result<Self, NotifierSetupError> {
        let smtp_password = resolve_credential(&config.credential_reference)?;
        let blog_password = resolve_credential(&config.blog_credential_reference)?;

        let mailer = SmtpMailer::connect(SmtpSettings {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            from_address: config.from_address.clone(),
            password: smtp_password,
        })?;
        let blog = WordPressClient::new(WordPressSettings {
            endpoint: config.blog_endpoint.clone(),
            username: config.blog_username.clone(),
            application_password: blog_password,
            status: config.blog_status,
        })?;

        Ok(Self::new(Box::new(mailer), Box::new(blog)))
    }

    pub fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailDeliveryError> {
        self.email.send_html(to, subject, html_body)
    }

    pub fn publish_blog(
        &self,
        title: &str,
        html_content: &str,
    ) -> Result<PublishedPost, BlogPublishError> {
        self.blog.publish(title, html_content)
    }
}
