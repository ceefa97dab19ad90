mod campaign;
pub mod content;
pub mod notify;
mod tier;

pub use campaign::{
    plan_promotions, CampaignError, CampaignReport, CampaignStage, OffSeasonCampaign,
    PromotionDispatch, PromotionPlan,
};
pub use content::{promotion_title, render_blog, render_email, ContentVariant};
pub use notify::{
    BlogGateway, BlogPublishError, EmailDeliveryError, EmailGateway, Notifier,
    NotifierSetupError, PostStatus, PublishedPost,
};
pub use tier::PromotionTier;
