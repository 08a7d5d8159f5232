use serde::Deserialize;

/// One search hit offered to the user for selection.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Candidate {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(year_from_release_date)
    }
}

/// A provider detail record with display fields already derived.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub description: String,
    pub img_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewMovie {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub description: String,
    pub img_url: Option<String>,
}

impl NewMovie {
    pub const PLACEHOLDER_RATING: f64 = 0.0;
}

impl From<MovieDetail> for NewMovie {
    fn from(detail: MovieDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title,
            year: detail.year,
            description: detail.description,
            img_url: detail.img_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddMovieForm {
    #[serde(default)]
    pub title: String,
}

impl AddMovieForm {
    pub fn validate(&self) -> Result<String, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title is required".to_string());
        }
        Ok(title.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, PartialEq)]
pub struct ValidEdit {
    pub rating: f64,
    pub review: String,
}

impl EditForm {
    pub const MAX_RATING: f64 = 10.0;

    /// Field-level messages are returned in form order.
    pub fn validate(&self) -> Result<ValidEdit, Vec<String>> {
        let mut errors = Vec::new();

        let rating = self.rating.trim();
        let rating = if rating.is_empty() {
            errors.push("rating is required".to_string());
            None
        } else {
            match rating.parse::<f64>() {
                Ok(r) if r.is_finite() && (0.0..=Self::MAX_RATING).contains(&r) => Some(r),
                Ok(_) => {
                    errors.push(format!("rating must be between 0 and {}", Self::MAX_RATING));
                    None
                },
                Err(_) => {
                    errors.push("rating must be a number".to_string());
                    None
                },
            }
        };

        let review = self.review.trim();
        if review.is_empty() {
            errors.push("review is required".to_string());
        }

        match rating {
            Some(rating) if errors.is_empty() => {
                Ok(ValidEdit { rating, review: review.to_string() })
            },
            _ => Err(errors),
        }
    }
}

/// Leading `-` separated component of an ISO date, e.g. `2010` for `2010-07-16`.
pub fn year_from_release_date(date: &str) -> Option<i32> {
    date.trim().split('-').next().and_then(|y| y.parse().ok())
}

pub fn poster_url(image_base: &str, poster_path: &str) -> String {
    format!("{}/{}", image_base.trim_end_matches('/'), poster_path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_leading_date_component() {
        assert_eq!(year_from_release_date("2010-07-16"), Some(2010));
        assert_eq!(year_from_release_date("1999"), Some(1999));
        assert_eq!(year_from_release_date(""), None);
        assert_eq!(year_from_release_date("soon"), None);
    }

    #[test]
    fn poster_url_joins_without_double_slash() {
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p/w500/", "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(poster_url("http://img", "abc.jpg"), "http://img/abc.jpg");
    }

    #[test]
    fn edit_form_accepts_valid_input() {
        let form = EditForm { rating: " 9 ".into(), review: "Great".into() };
        assert_eq!(form.validate(), Ok(ValidEdit { rating: 9.0, review: "Great".into() }));

        let form = EditForm { rating: "7.5".into(), review: "  fine ".into() };
        assert_eq!(form.validate(), Ok(ValidEdit { rating: 7.5, review: "fine".into() }));
    }

    #[test]
    fn edit_form_reports_every_missing_field() {
        let errors = EditForm::default().validate().unwrap_err();
        assert_eq!(errors, vec!["rating is required", "review is required"]);
    }

    #[test]
    fn edit_form_rejects_bad_ratings() {
        for bad in ["ten", "NaN", "-1", "10.5", "inf"] {
            let form = EditForm { rating: bad.into(), review: "ok".into() };
            assert!(form.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn candidate_reads_search_hit_with_missing_fields() {
        let hit: Candidate =
            serde_json::from_str(r#"{"id": 27205, "title": "Inception", "popularity": 80.1}"#)
                .unwrap();
        assert_eq!(hit.id, 27205);
        assert_eq!(hit.release_date, None);
        assert_eq!(hit.year(), None);

        let hit: Candidate = serde_json::from_str(
            r#"{"id": 1, "title": "Up", "release_date": "2009-05-28", "overview": null}"#,
        )
        .unwrap();
        assert_eq!(hit.year(), Some(2009));
        assert_eq!(hit.overview, None);
    }

    #[test]
    fn add_form_requires_title() {
        assert!(AddMovieForm { title: "   ".into() }.validate().is_err());
        assert_eq!(AddMovieForm { title: " Inception ".into() }.validate().unwrap(), "Inception");
    }
}
