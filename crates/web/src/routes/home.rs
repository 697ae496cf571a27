//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use super::LevelView;
use crate::filters;
use crate::middleware::OptionalLearner;

/// A selling point shown on the landing page.
#[derive(Clone)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURES: [Feature; 4] = [
    Feature {
        icon: "🤖",
        title: "Hands-On Learning",
        description: "Build real robots with our carefully designed STEM kits",
    },
    Feature {
        icon: "🧠",
        title: "Progressive Levels",
        description: "5 levels from beginner to advanced robotics",
    },
    Feature {
        icon: "💡",
        title: "Video Lessons",
        description: "Step-by-step video tutorials for each project",
    },
    Feature {
        icon: "👪",
        title: "For Kids 6-16",
        description: "Age-appropriate content that grows with your child",
    },
];

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub signed_in: bool,
    pub features: Vec<Feature>,
    pub levels: Vec<LevelView>,
}

/// Display the landing page.
#[instrument(skip_all)]
pub async fn home(OptionalLearner(learner): OptionalLearner) -> impl IntoResponse {
    HomeTemplate {
        signed_in: learner.is_some(),
        features: FEATURES.to_vec(),
        levels: LevelView::all(learner.map(|l| l.level())),
    }
}
