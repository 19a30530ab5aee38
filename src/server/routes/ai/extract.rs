use crate::error::AtelierError;
use atelier_schema::ThemeContext;
use atelier_schema::anthropic::ImageSource;
use axum::extract::{FromRequest, Multipart, Request};
use base64::Engine as _;
use tracing::{debug, warn};

const DEFAULT_MEDIA_TYPE: &str = "image/png";

/// Multipart form with an `image` file, an optional `theme` JSON string and an optional
/// `persist` flag.
#[derive(Debug, Clone)]
pub struct SpecUpload {
    pub image: ImageSource,
    pub theme: Option<ThemeContext>,
    pub persist: bool,
}

fn bad_form(e: impl std::fmt::Display) -> AtelierError {
    AtelierError::BadRequest(format!("Invalid form data: {e}"))
}

fn parse_theme(raw: &str) -> Option<ThemeContext> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<ThemeContext>(raw) {
        Ok(theme) => Some(theme),
        Err(e) => {
            warn!(error = %e, "ignoring unparseable theme field");
            None
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl<S> FromRequest<S> for SpecUpload
where
    S: Send + Sync,
{
    type Rejection = AtelierError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut form = Multipart::from_request(req, state).await.map_err(bad_form)?;

        let mut image = None;
        let mut theme = None;
        let mut persist = false;

        while let Some(field) = form.next_field().await.map_err(bad_form)? {
            match field.name() {
                Some("image") => {
                    let media_type = field
                        .content_type()
                        .filter(|ct| !ct.is_empty())
                        .unwrap_or(DEFAULT_MEDIA_TYPE)
                        .to_string();
                    let bytes = field.bytes().await.map_err(bad_form)?;
                    if bytes.is_empty() {
                        continue;
                    }
                    debug!(media_type = %media_type, bytes = bytes.len(), "received spec image");
                    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
                    image = Some(ImageSource::base64(media_type, data));
                }
                Some("theme") => {
                    theme = parse_theme(&field.text().await.map_err(bad_form)?);
                }
                Some("persist") => {
                    persist = parse_flag(&field.text().await.map_err(bad_form)?);
                }
                _ => {}
            }
        }

        let image =
            image.ok_or_else(|| AtelierError::BadRequest("No image file provided".to_string()))?;
        Ok(SpecUpload {
            image,
            theme,
            persist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_field_accepts_a_full_theme_row() {
        let raw = r##"{"id":1,"name":"Dark","value":"dark","colors":{"primary":"#fff"},"is_active":true}"##;
        let theme = parse_theme(raw).unwrap();
        assert_eq!(theme.name, "Dark");
        assert_eq!(theme.colors["primary"], "#fff");
    }

    #[test]
    fn broken_theme_is_ignored() {
        assert!(parse_theme("{not json").is_none());
        assert!(parse_theme("").is_none());
    }

    #[test]
    fn persist_flag_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
