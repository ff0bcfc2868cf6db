use chrono::{DateTime, Utc};

/// Characters of body text shown on the listing page.
pub const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: Option<String>,
    pub image: Option<String>,
    pub body: Option<String>,
    pub created: DateTime<Utc>,
}

/// Write-side field set. Nothing here is validated: absent fields reach the
/// store as absent. `created` is only honoured on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFields {
    pub title: Option<String>,
    pub image: Option<String>,
    pub body: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl Post {
    /// Build a freshly created post from the supplied fields.
    pub fn from_fields(id: String, fields: PostFields) -> Self {
        Self {
            id,
            title: fields.title,
            image: fields.image,
            body: fields.body,
            created: fields.created.unwrap_or_else(Utc::now),
        }
    }

    /// Replace every mutable field; `id` and `created` stay put.
    pub fn apply(&mut self, fields: PostFields) {
        self.title = fields.title;
        self.image = fields.image;
        self.body = fields.body;
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn created_date(&self) -> String {
        self.created.format("%a %b %d %Y").to_string()
    }

    pub fn created_ago(&self) -> String {
        format_relative_time(&self.created, &Utc::now())
    }

    /// Leading slice of the sanitized body. Never ends inside an entity such
    /// as `&amp;`, so the result stays valid escaped text.
    pub fn excerpt(&self) -> String {
        let body = self.body();
        let cut = match body.char_indices().nth(EXCERPT_CHARS) {
            Some((idx, _)) => idx,
            None => return body.to_string(),
        };

        let mut head = &body[..cut];
        if let Some(amp) = head.rfind('&') {
            if !head[amp..].contains(';') {
                head = &head[..amp];
            }
        }
        format!("{}...", head.trim_end())
    }
}

pub fn format_relative_time(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*dt);

    let seconds = diff.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = diff.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    dt.format("%b %-d, %Y").to_string()
}
