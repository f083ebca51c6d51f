use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::{is_valid_data_url, sanitize_text, AppError};

/// Captured insight (row of the `insights` table)
///
/// Older rows were written by the first extension release with
/// `page_url` / `note` / `screenshot_url`; newer ones use `url` / `text` /
/// `screenshots`. Both spellings are kept and read through the helpers below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct Insight {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Owner (auth user id)
    pub user_id: String,

    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
    /// Annotation added from the dashboard
    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub screenshots: Vec<String>,

    #[serde(default)]
    pub creator_email: Option<String>,

    pub created_at: String,
}

impl Insight {
    pub fn link(&self) -> Option<&str> {
        non_empty(self.url.as_deref()).or_else(|| non_empty(self.page_url.as_deref()))
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.page_title.as_deref())
    }

    /// Captured text, falling back to the note for rows without text
    pub fn body(&self) -> Option<&str> {
        non_empty(self.text.as_deref()).or_else(|| non_empty(self.note.as_deref()))
    }

    pub fn note(&self) -> Option<&str> {
        non_empty(self.note.as_deref())
    }

    /// All screenshots, with the legacy single screenshot first
    pub fn screenshot_list(&self) -> Vec<&str> {
        let mut list: Vec<&str> = Vec::with_capacity(self.screenshots.len() + 1);
        if let Some(single) = non_empty(self.screenshot_url.as_deref()) {
            list.push(single);
        }
        for shot in &self.screenshots {
            if !shot.is_empty() && !list.contains(&shot.as_str()) {
                list.push(shot);
            }
        }
        list
    }
}

/// Drops exactly the insight with `id`, keeping the order of the rest
pub fn remove_insight(insights: Vec<Insight>, id: &str) -> Vec<Insight> {
    insights.into_iter().filter(|insight| insight.id != id).collect()
}

/// Payload sent by the browser extension
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewInsight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl NewInsight {
    /// Sanitises free text and rejects screenshots that are not images.
    pub fn validated(self) -> Result<Self, AppError> {
        let clean = |value: Option<String>| {
            value
                .map(|v| sanitize_text(&v))
                .filter(|v| !v.is_empty())
        };

        let url = match self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            Some(u) if url::Url::parse(&u).is_err() => {
                return Err(AppError::InvalidRequest(format!("Invalid URL: {}", u)));
            }
            other => other,
        };

        for shot in &self.screenshots {
            let is_http = shot.starts_with("https://") || shot.starts_with("http://");
            if !is_http && !is_valid_data_url(shot) {
                return Err(AppError::InvalidRequest(
                    "Screenshots must be image data URLs or http(s) links".to_string(),
                ));
            }
        }

        let insight = Self {
            page_title: clean(self.page_title),
            url,
            text: clean(self.text),
            note: clean(self.note),
            screenshots: self.screenshots,
        };

        if insight.text.is_none() && insight.note.is_none() && insight.screenshots.is_empty() {
            return Err(AppError::InvalidRequest(
                "An insight needs text, a note or at least one screenshot".to_string(),
            ));
        }

        Ok(insight)
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct NoteUpdate {
    #[serde(default)]
    pub note: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn sample_insight(id: &str, user_id: &str, created_at: &str) -> Insight {
    Insight {
        id: id.to_string(),
        user_id: user_id.to_string(),
        page_title: Some(format!("Page {}", id)),
        page_url: None,
        url: Some(format!("https://example.com/{}", id)),
        text: Some(format!("Insight {}", id)),
        note: None,
        screenshot_url: None,
        screenshots: Vec::new(),
        creator_email: None,
        created_at: created_at.to_string(),
    }
}
