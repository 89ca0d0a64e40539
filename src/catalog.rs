use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

pub const PROJECTS_JSON: &str = include_str!("../config/projects.json");

const CARD_ROTATION_MS_BOUNDS: (u32, u32) = (500, 60_000);
const PROJECT_ROTATION_MS_BOUNDS: (u32, u32) = (500, 60_000);
const MANUAL_COOLDOWN_MS_BOUNDS: (u32, u32) = (0, 60_000);
const REVEAL_TICK_MS_BOUNDS: (u32, u32) = (10, 1_000);
const REVEAL_STEP_BOUNDS: (f64, f64) = (0.1, 100.0);
const OVERLAY_LINGER_MS_BOUNDS: (u32, u32) = (0, 5_000);
const SWIPE_DISTANCE_PX_BOUNDS: (f64, f64) = (10.0, 500.0);
const SWIPE_VELOCITY_BOUNDS: (f64, f64) = (0.05, 10.0);

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("project catalog is not valid JSON: {0}")]
    Parse(String),
    #[error("project catalog has no projects")]
    Empty,
    #[error("project at position {0} has an empty id")]
    MissingId(usize),
    #[error("project `{0}` has an empty title")]
    MissingTitle(String),
    #[error("project id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("project `{id}` has an invalid url `{url}`")]
    InvalidUrl { id: String, url: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub order: i32,
}

impl Project {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn has_preview(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalleryTimings {
    pub card_rotation_ms: u32,
    pub project_rotation_ms: u32,
    pub manual_cooldown_ms: u32,
    pub reveal_tick_ms: u32,
    pub reveal_step: f64,
    pub overlay_linger_ms: u32,
    pub swipe_distance_px: f64,
    pub swipe_velocity_px_per_ms: f64,
}

impl Default for GalleryTimings {
    fn default() -> Self {
        Self {
            card_rotation_ms: 4_000,
            project_rotation_ms: 5_000,
            manual_cooldown_ms: 3_000,
            reveal_tick_ms: 40,
            reveal_step: 1.0,
            overlay_linger_ms: 400,
            swipe_distance_px: 50.0,
            swipe_velocity_px_per_ms: 0.5,
        }
    }
}

impl GalleryTimings {
    /// Replaces every out-of-bounds value with its default.
    pub fn bounded(self) -> Self {
        let defaults = Self::default();
        Self {
            card_rotation_ms: within(
                self.card_rotation_ms,
                defaults.card_rotation_ms,
                CARD_ROTATION_MS_BOUNDS,
            ),
            project_rotation_ms: within(
                self.project_rotation_ms,
                defaults.project_rotation_ms,
                PROJECT_ROTATION_MS_BOUNDS,
            ),
            manual_cooldown_ms: within(
                self.manual_cooldown_ms,
                defaults.manual_cooldown_ms,
                MANUAL_COOLDOWN_MS_BOUNDS,
            ),
            reveal_tick_ms: within(
                self.reveal_tick_ms,
                defaults.reveal_tick_ms,
                REVEAL_TICK_MS_BOUNDS,
            ),
            reveal_step: within_f64(self.reveal_step, defaults.reveal_step, REVEAL_STEP_BOUNDS),
            overlay_linger_ms: within(
                self.overlay_linger_ms,
                defaults.overlay_linger_ms,
                OVERLAY_LINGER_MS_BOUNDS,
            ),
            swipe_distance_px: within_f64(
                self.swipe_distance_px,
                defaults.swipe_distance_px,
                SWIPE_DISTANCE_PX_BOUNDS,
            ),
            swipe_velocity_px_per_ms: within_f64(
                self.swipe_velocity_px_per_ms,
                defaults.swipe_velocity_px_per_ms,
                SWIPE_VELOCITY_BOUNDS,
            ),
        }
    }
}

fn within(value: u32, default: u32, bounds: (u32, u32)) -> u32 {
    if (bounds.0..=bounds.1).contains(&value) {
        value
    } else {
        default
    }
}

fn within_f64(value: f64, default: f64, bounds: (f64, f64)) -> f64 {
    if value.is_finite() && (bounds.0..=bounds.1).contains(&value) {
        value
    } else {
        default
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    timings: GalleryTimings,
    projects: Vec<Project>,
}

/// Immutable for the lifetime of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub projects: Vec<Project>,
    pub timings: GalleryTimings,
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let parsed: RawCatalog =
            serde_json::from_str(raw).map_err(|error| CatalogError::Parse(error.to_string()))?;

        let mut projects = parsed.projects;
        validate_projects(&projects)?;
        projects.sort_by_key(|project| project.order);

        Ok(Self {
            projects,
            timings: parsed.timings.bounded(),
        })
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(PROJECTS_JSON)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }
}

fn validate_projects(projects: &[Project]) -> Result<(), CatalogError> {
    if projects.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for (position, project) in projects.iter().enumerate() {
        let id = project.id.trim();
        if id.is_empty() {
            return Err(CatalogError::MissingId(position));
        }
        if project.title.trim().is_empty() {
            return Err(CatalogError::MissingTitle(id.to_string()));
        }
        if !seen.insert(id.to_string()) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
        if project.has_preview() && !is_http_url(&project.url) {
            return Err(CatalogError::InvalidUrl {
                id: id.to_string(),
                url: project.url.clone(),
            });
        }
    }

    Ok(())
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
pub fn sample_project(id: &str, title: &str, images: usize, url: &str) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        category: "Strona wizytówka".to_string(),
        description: None,
        images: (0..images).map(|index| format!("/mockups/{id}-{index}.webp")).collect(),
        url: url.to_string(),
        order: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_loads_and_is_sorted_by_order() {
        let catalog = Catalog::embedded().expect("embedded catalog should be valid");

        assert!(catalog.len() >= 1);
        let orders: Vec<i32> = catalog.projects.iter().map(|project| project.order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert!(catalog
            .projects
            .iter()
            .any(|project| project.title == "Fryzjerka Małgosia"));
    }

    #[test]
    fn sort_is_stable_for_equal_order() {
        let raw = r#"{"projects": [
            {"id": "b", "title": "B", "category": "x", "order": 2},
            {"id": "a1", "title": "A1", "category": "x", "order": 1},
            {"id": "a2", "title": "A2", "category": "x", "order": 1}
        ]}"#;

        let catalog = Catalog::from_json(raw).expect("valid catalog");
        let ids: Vec<&str> = catalog.projects.iter().map(|project| project.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b"]);
        assert_eq!(catalog.timings, GalleryTimings::default());
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(
            Catalog::from_json(r#"{"projects": []}"#),
            Err(CatalogError::Empty)
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"{"projects": [
            {"id": "a", "title": "A", "category": "x"},
            {"id": "a", "title": "Again", "category": "x"}
        ]}"#;

        assert_eq!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn rejects_non_http_preview_url() {
        let raw = r#"{"projects": [
            {"id": "a", "title": "A", "category": "x", "url": "javascript:alert(1)"}
        ]}"#;

        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn empty_url_is_listed_without_preview() {
        let raw = r#"{"projects": [{"id": "a", "title": "A", "category": "x"}]}"#;

        let catalog = Catalog::from_json(raw).expect("valid catalog");
        assert!(!catalog.projects[0].has_preview());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn out_of_bounds_timings_fall_back_to_defaults() {
        let raw = r#"{
            "timings": {"card_rotation_ms": 10, "manual_cooldown_ms": 1500, "reveal_step": -3.0},
            "projects": [{"id": "a", "title": "A", "category": "x"}]
        }"#;

        let timings = Catalog::from_json(raw).expect("valid catalog").timings;
        assert_eq!(timings.card_rotation_ms, 4_000);
        assert_eq!(timings.manual_cooldown_ms, 1_500);
        assert_eq!(timings.reveal_step, 1.0);
        assert_eq!(timings.project_rotation_ms, 5_000);
    }
}
