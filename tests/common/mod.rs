#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use offseason_promo::workflows::promotion::{
    BlogGateway, BlogPublishError, EmailDeliveryError, EmailGateway, Notifier, OffSeasonCampaign,
    PublishedPost,
};

pub const RECIPIENT: &str = "guests@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBlog {
    pub title: String,
    pub html: String,
}

#[derive(Debug, Default, Clone)]
pub struct Outbox {
    pub emails: Arc<Mutex<Vec<SentEmail>>>,
    pub posts: Arc<Mutex<Vec<PublishedBlog>>>,
}

impl Outbox {
    pub fn emails(&self) -> Vec<SentEmail> {
        self.emails.lock().expect("email mutex").clone()
    }

    pub fn posts(&self) -> Vec<PublishedBlog> {
        self.posts.lock().expect("post mutex").clone()
    }
}

#[derive(Debug)]
pub struct FakeEmailGateway {
    outbox: Outbox,
    fail_subject_containing: Option<String>,
}

impl EmailGateway for FakeEmailGateway {
    fn send_html(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailDeliveryError> {
        if let Some(needle) = &self.fail_subject_containing {
            if subject.contains(needle.as_str()) {
                return Err(EmailDeliveryError::Transport(
                    "535 authentication failed".to_string(),
                ));
            }
        }
        self.outbox.emails.lock().expect("email mutex").push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html_body.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeBlogGateway {
    outbox: Outbox,
    fail_title_containing: Option<String>,
}

impl BlogGateway for FakeBlogGateway {
    fn publish(&self, title: &str, html_content: &str) -> Result<PublishedPost, BlogPublishError> {
        if let Some(needle) = &self.fail_title_containing {
            if title.contains(needle.as_str()) {
                return Err(BlogPublishError::Rejected {
                    status: 403,
                    body: "{\"code\":\"rest_cannot_create\"}".to_string(),
                });
            }
        }
        let mut posts = self.outbox.posts.lock().expect("post mutex");
        posts.push(PublishedBlog {
            title: title.to_string(),
            html: html_content.to_string(),
        });
        Ok(PublishedPost {
            link: Some(format!("https://blog.example.com/?p={}", posts.len())),
        })
    }
}

#[derive(Debug, Default)]
pub struct CampaignFixture {
    pub email_failure: Option<&'static str>,
    pub blog_failure: Option<&'static str>,
}

impl CampaignFixture {
    pub fn build(self) -> (OffSeasonCampaign, Outbox) {
        let outbox = Outbox::default();
        let email = FakeEmailGateway {
            outbox: outbox.clone(),
            fail_subject_containing: self.email_failure.map(str::to_string),
        };
        let blog = FakeBlogGateway {
            outbox: outbox.clone(),
            fail_title_containing: self.blog_failure.map(str::to_string),
        };
        let notifier = Notifier::new(Box::new(email), Box::new(blog));
        (OffSeasonCampaign::new(notifier, RECIPIENT), outbox)
    }
}

pub fn healthy_campaign() -> (OffSeasonCampaign, Outbox) {
    CampaignFixture::default().build()
}
