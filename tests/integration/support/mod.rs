//! Fixture page driver
//!
//! `FixturePage` renders synthetic place-page markup for the state the page
//! is in (blank, place page, reviews panel) and reacts to clicks and scrolls
//! the way the real site does: the reviews feed grows by a fixed batch on
//! every scroll until it runs out of reviews.

use async_trait::async_trait;
use map_review_crawler::browser::{DriverError, DriverResult, Locator, PageDriver};
use map_review_crawler::config::CrawlerConfig;
use map_review_crawler::extract::{self, selectors};
use scraper::{Html, Selector};

/// Shape of the place the fixture serves
#[derive(Debug, Clone)]
pub struct FixturePlace {
    pub title: String,
    /// Total shown in the reviews panel header
    pub total_reviews: u64,
    /// Reviews the feed can actually render (`usize::MAX` for endless)
    pub available_reviews: usize,
    /// Reviews rendered when the panel opens
    pub initial_reviews: usize,
    /// Reviews added per scroll
    pub batch: usize,
    /// Feed stops growing after this many scrolls
    pub stall_after: Option<usize>,
    /// A loading spinner keeps the feed taller on every scroll, even when
    /// no reviews arrive
    pub spinner: bool,
    pub histogram: [u64; 5],
    pub average: &'static str,
    pub has_summary: bool,
    pub has_activities: bool,
    pub navigation_fails: bool,
}

impl Default for FixturePlace {
    fn default() -> Self {
        Self {
            title: "晨光民宿 - Google 地圖".to_string(),
            total_reviews: 3,
            available_reviews: 3,
            initial_reviews: 1,
            batch: 1,
            stall_after: None,
            spinner: false,
            histogram: [2, 1, 0, 0, 0],
            average: "4.7",
            has_summary: true,
            has_activities: true,
            navigation_fails: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    Place { activities_open: bool },
    Reviews,
}

pub struct FixturePage {
    pub place: FixturePlace,
    view: View,
    url: String,
    loaded: usize,
    spinner_height: f64,
    pub scrolls: usize,
    pub visited: Vec<String>,
}

impl FixturePage {
    pub fn new(place: FixturePlace) -> Self {
        Self {
            place,
            view: View::Blank,
            url: "about:blank".to_string(),
            loaded: 0,
            spinner_height: 0.0,
            scrolls: 0,
            visited: Vec::new(),
        }
    }

    /// A page already showing the reviews panel
    pub fn with_reviews_open(place: FixturePlace) -> Self {
        let mut page = Self::new(place);
        page.open_reviews();
        page
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    fn open_reviews(&mut self) {
        self.view = View::Reviews;
        self.url = format!("{}&panel=reviews", self.url);
        self.loaded = self.place.initial_reviews.min(self.place.available_reviews);
    }

    fn render(&self) -> String {
        let body = match self.view {
            View::Blank => String::new(),
            View::Place { activities_open } => self.render_place(activities_open),
            View::Reviews => self.render_reviews(),
        };
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            self.place.title, body
        )
    }

    fn render_place(&self, activities_open: bool) -> String {
        let mut html = String::new();

        if self.place.has_summary {
            html.push_str(
                r#"<div class="q1__location-summary-body">
                     <div class="q1__formatted-score-container">4.3</div>
                     <div><div class="q1__location-summary-overview-text">交通便利，鄰近夜市</div></div>
                   </div>"#,
            );
        }

        if self.place.has_activities {
            html.push_str(r#"<button aria-label="建議活動">建議活動</button>"#);
        }

        if activities_open {
            html.push_str(
                r#"<div class="panel">
                     <div class="head"><h2>地點摘要</h2></div>
                     <div class="q1-section-layout-inset-shadow">
                       <div class="q1__section">
                         <div class="q1__title">士林夜市</div>
                         <span class="q1__rating">4.4</span>
                         <span class="q1__reviews">(12,345)</span>
                         <div class="q1__description">台北最大的
夜市</div>
                       </div>
                       <div class="q1__section">
                         <div class="q1__title">故宮博物院</div>
                         <span class="q1__rating">4,6</span>
                         <span class="q1__reviews">(8,001)</span>
                       </div>
                     </div>
                   </div>"#,
            );
        }

        html.push_str(&format!(
            r#"<button class="allxGeDnJMl__button allxGeDnJMl__button-text" aria-label="{} 則評論">評論</button>"#,
            self.place.total_reviews
        ));
        html
    }

    fn render_reviews(&self) -> String {
        let histogram: String = self
            .place
            .histogram
            .iter()
            .enumerate()
            .map(|(i, count)| {
                format!(
                    r#"<tr class="q2__histogram"><td>{}</td><td><div aria-label="{} 則評論"></div></td></tr>"#,
                    5 - i,
                    count
                )
            })
            .collect();

        let reviews: String = (0..self.loaded).map(review_html).collect();

        format!(
            r#"<div class="gm2-display-2">{}</div>
               <div class="gm2-caption">{} 則評論</div>
               <table>{}</table>
               <div class="section-scrollbox scrollable-y scrollable-show">{}</div>"#,
            self.place.average, self.place.total_reviews, histogram, reviews
        )
    }

    fn feed_height(&self) -> f64 {
        100.0 + 120.0 * self.loaded as f64 + self.spinner_height
    }
}

/// Expected rating of the review at `index`
pub fn review_rating(index: usize) -> u8 {
    (index % 5) as u8 + 1
}

fn review_html(index: usize) -> String {
    let rating = review_rating(index);
    let rating_html = if index % 2 == 0 {
        format!(r#"<span class="section-review-stars" aria-label=" {} 顆星 "></span>"#, rating)
    } else {
        format!(r#"<span class="section-review-numerical-rating">{}/5</span>"#, rating)
    };
    format!(
        r#"<div class="section-review-content">
             <div class="section-review-title">Reviewer {}</div>
             {}
             <span class="section-review-text">Review text {}
line two</span>
           </div>"#,
        index, rating_html, index
    )
}

fn css_matches(html: &str, css: &str) -> DriverResult<usize> {
    let selector = Selector::parse(css).map_err(|e| DriverError::Script(format!("{:?}", e)))?;
    Ok(Html::parse_document(html).select(&selector).count())
}

#[async_trait]
impl PageDriver for FixturePage {
    async fn goto(&mut self, url: &str) -> DriverResult<()> {
        self.visited.push(url.to_string());
        if self.place.navigation_fails {
            return Err(DriverError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        self.url = url.to_string();
        self.view = View::Place {
            activities_open: false,
        };
        self.loaded = 0;
        Ok(())
    }

    async fn current_url(&mut self) -> DriverResult<String> {
        Ok(self.url.clone())
    }

    async fn is_present(&mut self, locator: &Locator, _visible: bool) -> DriverResult<bool> {
        let html = self.render();
        match locator {
            Locator::Css(css) => Ok(css_matches(&html, css)? > 0),
            Locator::XPath(expression) if expression == selectors::ACTIVITY_SECTIONS_XPATH => {
                let document = Html::parse_document(&html);
                Ok(!extract::activity_sections(&document).is_empty())
            }
            Locator::XPath(expression) => Err(DriverError::Script(format!(
                "fixture cannot evaluate {}",
                expression
            ))),
        }
    }

    async fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        if !self.is_present(locator, true).await? {
            return Err(DriverError::ElementNotFound(locator.to_string()));
        }

        match (locator, self.view) {
            (Locator::Css(css), View::Place { .. }) if css == selectors::ACTIVITIES_BUTTON => {
                self.view = View::Place {
                    activities_open: true,
                };
                Ok(())
            }
            (Locator::Css(css), View::Place { .. }) if css == selectors::REVIEWS_BUTTON => {
                self.open_reviews();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn content(&mut self) -> DriverResult<String> {
        Ok(self.render())
    }

    async fn title(&mut self) -> DriverResult<String> {
        Ok(self.place.title.clone())
    }

    async fn scroll_height(&mut self, css: &str) -> DriverResult<Option<f64>> {
        if self.view == View::Reviews && css == selectors::SCROLL_CONTAINER {
            Ok(Some(self.feed_height()))
        } else {
            Ok(None)
        }
    }

    async fn scroll_to_bottom(&mut self, css: &str) -> DriverResult<()> {
        if self.view != View::Reviews || css != selectors::SCROLL_CONTAINER {
            return Err(DriverError::ElementNotFound(css.to_string()));
        }

        self.scrolls += 1;
        if self.place.spinner {
            self.spinner_height += 40.0;
        }
        let growing = self
            .place
            .stall_after
            .map(|limit| self.scrolls <= limit)
            .unwrap_or(true);
        if growing {
            self.loaded = self
                .loaded
                .saturating_add(self.place.batch)
                .min(self.place.available_reviews);
        }
        Ok(())
    }

    async fn count(&mut self, css: &str) -> DriverResult<usize> {
        css_matches(&self.render(), css)
    }
}

/// Crawler settings with short timeouts for tests
pub fn fast_config() -> CrawlerConfig {
    CrawlerConfig {
        settle_delay_ms: 0,
        wait_timeout_ms: 200,
        growth_timeout_ms: 200,
        navigation_timeout_ms: 500,
        poll_interval_ms: 10,
        ..CrawlerConfig::default()
    }
}
