//! Business analytics scorers
//!
//! Pure keyword/threshold heuristics over news, stock, and social-media
//! records. These are dictionary lookups and averages, not models.

use serde::{Deserialize, Serialize};

/// Positive Vietnamese lexical markers for news sentiment
const POSITIVE_KEYWORDS: [&str; 5] = ["tăng", "phát triển", "thành công", "tích cực", "cải thiện"];

/// Negative Vietnamese lexical markers for news sentiment
const NEGATIVE_KEYWORDS: [&str; 5] = ["giảm", "khó khăn", "thất bại", "tiêu cực", "khủng hoảng"];

/// A news article as delivered by the backend snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A stock record carrying its change since the previous close
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StockChange {
    #[serde(default)]
    pub change: f64,
}

/// A social-media post carrying an engagement count
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SocialPost {
    #[serde(default)]
    pub engagement: f64,
}

/// News sentiment summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub sentiment: &'static str,
    pub score: i64,
    pub articles: usize,
    pub confidence: f64,
}

/// Stock trend summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub trend: &'static str,
    pub average_change: f64,
    pub positive_stocks: usize,
    pub negative_stocks: usize,
    pub total_stocks: usize,
}

/// Social engagement summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementReport {
    pub engagement: &'static str,
    pub total_engagement: f64,
    pub average_engagement: f64,
    pub posts: usize,
}

/// Score news sentiment by keyword membership
///
/// Each keyword found anywhere in an article's lowercased title or
/// description contributes +1 or -1; the sign of the sum picks the label and
/// confidence is `min(|score| / articles, 1.0)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn news_sentiment(articles: &[Article]) -> SentimentReport {
    if articles.is_empty() {
        return SentimentReport {
            sentiment: "neutral",
            score: 0,
            articles: 0,
            confidence: 0.0,
        };
    }

    let mut score: i64 = 0;
    for article in articles {
        let title = article.title.to_lowercase();
        let description = article.description.to_lowercase();

        for keyword in POSITIVE_KEYWORDS {
            if title.contains(keyword) || description.contains(keyword) {
                score += 1;
            }
        }
        for keyword in NEGATIVE_KEYWORDS {
            if title.contains(keyword) || description.contains(keyword) {
                score -= 1;
            }
        }
    }

    let sentiment = match score.signum() {
        1 => "positive",
        -1 => "negative",
        _ => "neutral",
    };

    SentimentReport {
        sentiment,
        score,
        articles: articles.len(),
        confidence: (score.unsigned_abs() as f64 / articles.len() as f64).min(1.0),
    }
}

/// Score market trend by the majority sign of stock changes
///
/// A tie is neutral; the mean change is rounded to 2 decimal places.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stock_trend(stocks: &[StockChange]) -> TrendReport {
    if stocks.is_empty() {
        return TrendReport {
            trend: "neutral",
            average_change: 0.0,
            positive_stocks: 0,
            negative_stocks: 0,
            total_stocks: 0,
        };
    }

    let positive = stocks.iter().filter(|s| s.change > 0.0).count();
    let negative = stocks.iter().filter(|s| s.change < 0.0).count();

    let trend = if positive > negative {
        "bullish"
    } else if negative > positive {
        "bearish"
    } else {
        "neutral"
    };

    let average = stocks.iter().map(|s| s.change).sum::<f64>() / stocks.len() as f64;

    TrendReport {
        trend,
        average_change: (average * 100.0).round() / 100.0,
        positive_stocks: positive,
        negative_stocks: negative,
        total_stocks: stocks.len(),
    }
}

/// Score social engagement by mean engagement thresholds
///
/// Above 1000 is high, above 500 is medium, anything else low.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn social_engagement(posts: &[SocialPost]) -> EngagementReport {
    if posts.is_empty() {
        return EngagementReport {
            engagement: "low",
            total_engagement: 0.0,
            average_engagement: 0.0,
            posts: 0,
        };
    }

    let total: f64 = posts.iter().map(|p| p.engagement).sum();
    let average = total / posts.len() as f64;

    let engagement = if average > 1000.0 {
        "high"
    } else if average > 500.0 {
        "medium"
    } else {
        "low"
    };

    EngagementReport {
        engagement,
        total_engagement: total,
        average_engagement: average.round(),
        posts: posts.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, description: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn sentiment_empty_is_neutral() {
        let report = news_sentiment(&[]);
        assert_eq!(report.sentiment, "neutral");
        assert_eq!(report.articles, 0);
        assert_eq!(report.score, 0);
        assert!(report.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn sentiment_positive_marker_scores_at_least_one() {
        let report = news_sentiment(&[article("Doanh thu tăng mạnh", "")]);
        assert_eq!(report.sentiment, "positive");
        assert!(report.score >= 1);
        assert_eq!(report.articles, 1);
    }

    #[test]
    fn sentiment_mixed_markers_cancel() {
        let report = news_sentiment(&[article("Giá tăng", "Xuất khẩu giảm")]);
        assert_eq!(report.sentiment, "neutral");
        assert_eq!(report.score, 0);
    }

    #[test]
    fn sentiment_multiple_markers_accumulate() {
        let report = news_sentiment(&[article(
            "Phát triển thành công",
            "Kết quả tích cực",
        )]);
        assert_eq!(report.score, 3);
        assert!((report.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sentiment_confidence_is_capped() {
        let articles = vec![
            article("tăng", ""),
            article("", "không có gì"),
            article("", "bình thường"),
        ];
        let report = news_sentiment(&articles);
        assert!((report.confidence - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_all_positive_is_bullish() {
        let stocks: Vec<StockChange> = (1..=5).map(|i| StockChange { change: f64::from(i) }).collect();
        let report = stock_trend(&stocks);
        assert_eq!(report.trend, "bullish");
        assert_eq!(report.positive_stocks, 5);
        assert_eq!(report.negative_stocks, 0);
        assert_eq!(report.total_stocks, 5);
        assert!((report.average_change - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_tie_is_neutral() {
        let stocks = [StockChange { change: 1.0 }, StockChange { change: -1.0 }];
        let report = stock_trend(&stocks);
        assert_eq!(report.trend, "neutral");
        assert!(report.average_change.abs() < f64::EPSILON);
    }

    #[test]
    fn trend_average_rounds_to_two_decimals() {
        let stocks = [
            StockChange { change: 1.0 },
            StockChange { change: 1.0 },
            StockChange { change: 1.005 },
        ];
        let report = stock_trend(&stocks);
        assert!((report.average_change - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_high_threshold() {
        let posts = [
            SocialPost { engagement: 2000.0 },
            SocialPost { engagement: 2000.0 },
        ];
        let report = social_engagement(&posts);
        assert_eq!(report.engagement, "high");
        assert!((report.average_engagement - 2000.0).abs() < f64::EPSILON);
        assert!((report.total_engagement - 4000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_medium_and_low_thresholds() {
        let medium = social_engagement(&[SocialPost { engagement: 700.0 }]);
        assert_eq!(medium.engagement, "medium");

        let low = social_engagement(&[SocialPost { engagement: 100.0 }]);
        assert_eq!(low.engagement, "low");

        let empty = social_engagement(&[]);
        assert_eq!(empty.engagement, "low");
        assert_eq!(empty.posts, 0);
    }
}
