/// Crawl stage definitions for the per-place state machine
///
/// A crawl walks these stages strictly forward, one at a time. There are no
/// backward transitions and a failure in any stage ends the crawl for that
/// place.
use std::fmt;

/// A stage of the per-place crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrawlStage {
    /// Load the place page from its query URL
    NavigateToPlace,

    /// Wait for the location summary block and read it
    AwaitLocationSummary,

    /// Open the "things to do" panel and read the activities
    OpenActivitiesPanel,

    /// Open the reviews panel and wait for the first review
    OpenReviewsPanel,

    /// Read the star histogram, average and total
    ExtractRatingSnapshot,

    /// Scroll the review feed until enough reviews are loaded
    ScrollAndCollect,

    /// Read every rendered review
    ExtractReviews,

    /// Read the title and assemble the result
    Finalize,
}

impl CrawlStage {
    /// First stage of every crawl
    pub const FIRST: CrawlStage = CrawlStage::NavigateToPlace;

    /// Returns the stage that follows this one, or None for `Finalize`
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::NavigateToPlace => Some(Self::AwaitLocationSummary),
            Self::AwaitLocationSummary => Some(Self::OpenActivitiesPanel),
            Self::OpenActivitiesPanel => Some(Self::OpenReviewsPanel),
            Self::OpenReviewsPanel => Some(Self::ExtractRatingSnapshot),
            Self::ExtractRatingSnapshot => Some(Self::ScrollAndCollect),
            Self::ScrollAndCollect => Some(Self::ExtractReviews),
            Self::ExtractReviews => Some(Self::Finalize),
            Self::Finalize => None,
        }
    }

    /// Returns true if `to` may directly follow this stage
    pub fn can_transition_to(&self, to: CrawlStage) -> bool {
        self.next() == Some(to)
    }

    /// Short identifier used in log lines and run summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NavigateToPlace => "navigate",
            Self::AwaitLocationSummary => "location_summary",
            Self::OpenActivitiesPanel => "activities",
            Self::OpenReviewsPanel => "reviews_panel",
            Self::ExtractRatingSnapshot => "rating_snapshot",
            Self::ScrollAndCollect => "scroll",
            Self::ExtractReviews => "reviews",
            Self::Finalize => "finalize",
        }
    }

    /// Returns all stages in execution order
    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::NavigateToPlace,
            Self::AwaitLocationSummary,
            Self::OpenActivitiesPanel,
            Self::OpenReviewsPanel,
            Self::ExtractRatingSnapshot,
            Self::ScrollAndCollect,
            Self::ExtractReviews,
            Self::Finalize,
        ]
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the current stage of one crawl and rejects illegal transitions
#[derive(Debug, Default)]
pub struct StageTracker {
    current: Option<CrawlStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stage currently running, if any
    pub fn current(&self) -> Option<CrawlStage> {
        self.current
    }

    /// Moves to `to`
    ///
    /// Only `CrawlStage::FIRST` may be entered from the initial state, and
    /// afterwards only the immediate successor of the current stage.
    pub fn enter(&mut self, to: CrawlStage) -> Result<CrawlStage, (Option<CrawlStage>, CrawlStage)> {
        let allowed = match self.current {
            None => to == CrawlStage::FIRST,
            Some(from) => from.can_transition_to(to),
        };

        if !allowed {
            return Err((self.current, to));
        }

        self.current = Some(to);
        Ok(to)
    }
}
