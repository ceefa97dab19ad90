use super::tier::PromotionTier;
use chrono::Month;

/// Which channel a rendered promotion is meant for. The variants share a
/// body and differ only in the closing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentVariant {
    Email,
    Blog,
}

impl ContentVariant {
    const fn closing(self) -> &'static str {
        match self {
            Self::Email => "Don't miss out!",
            Self::Blog => "Take advantage of this limited-time offer!",
        }
    }
}

/// Subject line for the email and title for the blog post.
pub fn promotion_title(month: Month) -> String {
    format!("Special Offer in {}", month.name())
}

pub fn render_promotion(
    variant: ContentVariant,
    month: &str,
    percentage_drop: f64,
    tier: PromotionTier,
) -> String {
    let month = escape_html(month);
    let tier = escape_html(tier.label());

    let mut html = String::new();
    html.push_str(&format!("<h1>Special {tier} in {month}</h1>\n"));
    html.push_str(&format!(
        "<p>This month, we are offering a {tier} due to the performance drop of {percentage_drop:.2}%.</p>\n"
    ));
    html.push_str(&format!("<p>{}</p>\n", variant.closing()));
    html
}

pub fn render_email(month: &str, percentage_drop: f64, tier: PromotionTier) -> String {
    render_promotion(ContentVariant::Email, month, percentage_drop, tier)
}

pub fn render_blog(month: &str, percentage_drop: f64, tier: PromotionTier) -> String {
    render_promotion(ContentVariant::Blog, month, percentage_drop, tier)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
