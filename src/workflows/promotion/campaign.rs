use chrono::Month;
use std::fmt;
use tracing::{error, info};

use super::content::{promotion_title, render_blog, render_email};
use super::notify::{BlogPublishError, EmailDeliveryError, Notifier};
use super::tier::PromotionTier;
use crate::workflows::off_season::{OffSeasonDetection, OffSeasonEntry};

/// Classified and rendered promotion for one off-season month.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionPlan {
    pub month: Month,
    pub percentage_drop: f64,
    pub tier: PromotionTier,
    pub title: String,
    pub email_html: String,
    pub blog_html: String,
}

impl PromotionPlan {
    pub fn for_entry(entry: &OffSeasonEntry) -> Self {
        let tier = PromotionTier::classify(entry.percentage_drop);
        let month = entry.month.name();
        Self {
            month: entry.month,
            percentage_drop: entry.percentage_drop,
            tier,
            title: promotion_title(entry.month),
            email_html: render_email(month, entry.percentage_drop, tier),
            blog_html: render_blog(month, entry.percentage_drop, tier),
        }
    }
}

pub fn plan_promotions(detection: &OffSeasonDetection) -> Vec<PromotionPlan> {
    detection.entries.iter().map(PromotionPlan::for_entry).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDispatch {
    pub month: Month,
    pub tier: PromotionTier,
    pub blog_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignReport {
    pub dispatched: Vec<PromotionDispatch>,
}

impl CampaignReport {
    pub fn months(&self) -> Vec<Month> {
        self.dispatched.iter().map(|dispatch| dispatch.month).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStage {
    Email,
    Blog,
}

impl fmt::Display for CampaignStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStage::Email => f.write_str("email"),
            CampaignStage::Blog => f.write_str("blog"),
        }
    }
}

/// First failure of a campaign run. `completed` lists months whose email and
/// blog post both went out before the failure. The gateway error is part of
/// the message and is not exposed again as a source.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("promotion email for {} failed: {error}", .month.name())]
    Email {
        month: Month,
        completed: Vec<Month>,
        error: EmailDeliveryError,
    },
    #[error("promotion blog post for {} failed: {error}", .month.name())]
    Blog {
        month: Month,
        completed: Vec<Month>,
        error: BlogPublishError,
    },
}

impl CampaignError {
    pub fn month(&self) -> Month {
        match self {
            CampaignError::Email { month, .. } | CampaignError::Blog { month, .. } => *month,
        }
    }

    pub fn stage(&self) -> CampaignStage {
        match self {
            CampaignError::Email { .. } => CampaignStage::Email,
            CampaignError::Blog { .. } => CampaignStage::Blog,
        }
    }

    pub fn completed(&self) -> &[Month] {
        match self {
            CampaignError::Email { completed, .. } | CampaignError::Blog { completed, .. } => {
                completed
            }
        }
    }
}

/// Sends the email and blog promotion for every detected off-season month,
/// stopping at the first failure.
#[derive(Debug)]
pub struct OffSeasonCampaign {
    notifier: Notifier,
    recipient: String,
}

impl OffSeasonCampaign {
    pub fn new(notifier: Notifier, recipient: impl Into<String>) -> Self {
        Self {
            notifier,
            recipient: recipient.into(),
        }
    }

    pub fn launch(&self, detection: &OffSeasonDetection) -> Result<CampaignReport, CampaignError> {
        let mut report = CampaignReport::default();

        for plan in plan_promotions(detection) {
            info!(
                month = plan.month.name(),
                percentage_drop = plan.percentage_drop,
                tier = %plan.tier,
                "dispatching off-season promotion"
            );

            let sent = self
                .notifier
                .send_email(&self.recipient, &plan.title, &plan.email_html);
            if let Err(source) = sent {
                error!(
                    month = plan.month.name(),
                    stage = %CampaignStage::Email,
                    error = %source,
                    "promotion aborted"
                );
                return Err(CampaignError::Email {
                    month: plan.month,
                    completed: report.months(),
                    error: source,
                });
            }

            let post = match self.notifier.publish_blog(&plan.title, &plan.blog_html) {
                Ok(post) => post,
                Err(source) => {
                    error!(
                        month = plan.month.name(),
                        stage = %CampaignStage::Blog,
                        error = %source,
                        "promotion aborted"
                    );
                    return Err(CampaignError::Blog {
                        month: plan.month,
                        completed: report.months(),
                        error: source,
                    });
                }
            };

            match post.link.as_deref() {
                Some(link) => info!(month = plan.month.name(), link, "blog post created"),
                None => info!(month = plan.month.name(), "blog post created"),
            }

            report.dispatched.push(PromotionDispatch {
                month: plan.month,
                tier: plan.tier,
                blog_link: post.link,
            });
        }

        info!(promotions = report.dispatched.len(), "off-season campaign complete");
        Ok(report)
    }
}
