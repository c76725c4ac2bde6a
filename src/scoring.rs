use crate::results::{AnalyticsScores, Impact, Metadata, Recommendation};

/// Every score starts here before recommendation impacts are applied
const BASELINE: f64 = 80.0;

/// Classification target for a recommendation's category string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Seo,
    Performance,
    Accessibility,
    UserExperience,
    Conversion,
    Security,
    Mobile,
    Content,
    Technical,
    Other,
}

const BUCKET_COUNT: usize = 10;

/// Ordered classification rules. The first bucket whose substring list
/// matches the lowercased category wins; anything unmatched lands in
/// [`Bucket::Other`] and carries no score weight.
const BUCKET_RULES: &[(Bucket, &[&str])] = &[
    (Bucket::Seo, &["seo"]),
    (Bucket::Performance, &["performance", "speed", "load"]),
    (Bucket::Accessibility, &["accessibility", "a11y"]),
    (Bucket::UserExperience, &["user_experience", "ux", "navigation"]),
    (Bucket::Conversion, &["conversion", "cta"]),
    (Bucket::Security, &["security", "privacy"]),
    (Bucket::Mobile, &["mobile", "responsive"]),
    (Bucket::Content, &["content"]),
    (Bucket::Technical, &["technical"]),
];

fn classify(category: &str) -> Bucket {
    let category = category.to_lowercase();
    for (bucket, needles) in BUCKET_RULES {
        if needles.iter().any(|needle| category.contains(needle)) {
            return *bucket;
        }
    }
    Bucket::Other
}

/// Score deduction carried by one recommendation
fn impact_weight(impact: Impact) -> f64 {
    match impact {
        Impact::High => -10.0,
        Impact::Medium => -5.0,
        Impact::Low => -2.0,
        // Unrecognized levels still count against the score
        Impact::Unknown => -3.0,
    }
}

/// Working scores, kept fractional until the final rounding pass
struct RawScores {
    seo: f64,
    performance: f64,
    accessibility: f64,
    best_practices: f64,
}

impl RawScores {
    fn baseline() -> Self {
        Self {
            seo: BASELINE,
            performance: BASELINE,
            accessibility: BASELINE,
            best_practices: BASELINE,
        }
    }

    /// Apply the aggregated per-bucket impacts
    fn apply_impacts(&mut self, impacts: &[f64; BUCKET_COUNT]) {
        self.seo += impacts[Bucket::Seo as usize];
        self.performance += impacts[Bucket::Performance as usize];
        self.accessibility += impacts[Bucket::Accessibility as usize];

        // UX, conversion and security all count against best practices
        self.best_practices += impacts[Bucket::UserExperience as usize];
        self.best_practices += impacts[Bucket::Conversion as usize];
        self.best_practices += impacts[Bucket::Security as usize];

        // Technical issues are shared between SEO and performance
        let technical = impacts[Bucket::Technical as usize];
        self.seo += technical / 2.0;
        self.performance += technical / 2.0;

        // Content problems count against SEO
        self.seo += impacts[Bucket::Content as usize];

        // Mobile issues are shared between best practices and SEO
        let mobile = impacts[Bucket::Mobile as usize];
        self.best_practices += mobile / 2.0;
        self.seo += mobile / 2.0;
    }

    /// Nudge scores based on page-level facts.
    ///
    /// Presence is checked explicitly: an absent field is not the same
    /// as an empty one, except for title and description where a blank
    /// string counts as missing.
    fn apply_metadata(&mut self, metadata: &Metadata) {
        match &metadata.title {
            None => self.seo -= 15.0,
            Some(title) if title.trim().is_empty() => self.seo -= 15.0,
            Some(title) if title.chars().count() < 10 => self.seo -= 5.0,
            Some(title) if title.chars().count() > 60 => self.seo -= 3.0,
            Some(_) => {}
        }

        match &metadata.description {
            None => self.seo -= 10.0,
            Some(desc) if desc.trim().is_empty() => self.seo -= 10.0,
            Some(desc) if desc.chars().count() < 50 => self.seo -= 5.0,
            Some(desc) if desc.chars().count() > 160 => self.seo -= 3.0,
            Some(_) => {}
        }

        // Only the first matching threshold fires, tested high to low
        if let Some(page_size) = metadata.page_size {
            if page_size > 5_000_000 {
                self.performance -= 15.0;
            } else if page_size > 2_000_000 {
                self.performance -= 10.0;
            } else if page_size > 1_000_000 {
                self.performance -= 5.0;
            }
        }

        if let Some(load_time) = metadata.load_time {
            if load_time < 1.0 {
                self.performance += 10.0;
            } else if load_time < 2.0 {
                self.performance += 5.0;
            } else if load_time > 4.0 {
                self.performance -= 15.0;
            } else if load_time > 3.0 {
                self.performance -= 10.0;
            }
        }

        if let Some(meta_tags) = &metadata.meta_tags {
            if meta_tags.contains_key("viewport") {
                self.best_practices += 5.0;
                self.accessibility += 3.0;
            }
            if meta_tags.contains_key("robots") {
                self.seo += 5.0;
            }
            let has_social_tags = meta_tags
                .keys()
                .any(|key| key.contains("og:") || key.contains("twitter:"));
            if has_social_tags {
                self.seo += 3.0;
            }
        }
    }

    fn finish(&self) -> AnalyticsScores {
        AnalyticsScores {
            seo_score: clamp_score(self.seo),
            performance_score: clamp_score(self.performance),
            accessibility_score: clamp_score(self.accessibility),
            best_practices_score: clamp_score(self.best_practices),
        }
    }
}

/// Round, then pin to the 0-100 integer range
fn clamp_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

/// Derive the four quality scores for a completed analysis.
///
/// Pure and deterministic: identical input always yields identical
/// output, every returned score is an integer in 0-100, and nothing
/// here can fail — unrecognized categories and impact levels use
/// documented fallbacks instead.
pub fn calculate_scores(recommendations: &[Recommendation], metadata: &Metadata) -> AnalyticsScores {
    let mut impacts = [0.0_f64; BUCKET_COUNT];
    for rec in recommendations {
        impacts[classify(&rec.category) as usize] += impact_weight(rec.impact);
    }

    let mut scores = RawScores::baseline();
    scores.apply_impacts(&impacts);
    scores.apply_metadata(metadata);
    scores.finish()
}
