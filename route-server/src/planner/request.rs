//! Route requests: the wire envelope and its validated form.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{CountryCode, TransportMode};

use super::EngineError;

/// How a country classification (prohibited or restricted) is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// Disregard the classification; only the plain avoid list applies.
    Ignore,
    /// Soft-avoid: traversal is allowed but penalized.
    Avoid,
    /// Hard elimination.
    Strict,
}

impl FromStr for Flag {
    type Err = EngineError;

    /// Case-insensitive. `allow` is accepted as an alias of `ignore`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "allow" => Ok(Flag::Ignore),
            "avoid" => Ok(Flag::Avoid),
            "strict" => Ok(Flag::Strict),
            _ => Err(EngineError::validation(
                "flag",
                format!("unknown flag {s:?} (expected ignore, avoid or strict)"),
            )),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flag::Ignore => "ignore",
            Flag::Avoid => "avoid",
            Flag::Strict => "strict",
        })
    }
}

/// Time/price preference pair, clamped to [0, 1] and summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    time: f64,
    price: f64,
}

impl Weights {
    /// Normalize a caller-supplied weight pair.
    ///
    /// Each weight is clamped to [0, 1], then both are divided by their sum.
    /// If both clamp to zero there is no stated preference and the pair
    /// becomes 0.5/0.5. Non-finite weights are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::planner::Weights;
    ///
    /// let w = Weights::normalize(0.3, 0.3).unwrap();
    /// assert_eq!(w.time(), 0.5);
    /// assert_eq!(w.price(), 0.5);
    ///
    /// let w = Weights::normalize(1.7, -0.2).unwrap();
    /// assert_eq!(w.time(), 1.0);
    /// assert_eq!(w.price(), 0.0);
    /// ```
    pub fn normalize(time: f64, price: f64) -> Result<Self, EngineError> {
        if !time.is_finite() {
            return Err(EngineError::validation(
                "time_weight",
                format!("must be a finite number, got {time}"),
            ));
        }
        if !price.is_finite() {
            return Err(EngineError::validation(
                "price_weight",
                format!("must be a finite number, got {price}"),
            ));
        }

        let time = time.clamp(0.0, 1.0);
        let price = price.clamp(0.0, 1.0);
        let sum = time + price;
        if sum == 0.0 {
            return Ok(Self {
                time: 0.5,
                price: 0.5,
            });
        }

        Ok(Self {
            time: time / sum,
            price: price / sum,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

fn default_top_n() -> i64 {
    3
}

fn default_weight() -> f64 {
    0.5
}

fn default_modes() -> Vec<String> {
    TransportMode::ALL
        .iter()
        .map(|m| m.as_str().to_string())
        .collect()
}

fn default_flag() -> String {
    "avoid".to_string()
}

/// Route request as submitted by the client.
///
/// Values are only checked for their JSON type here; ranges, codes and
/// flags are checked by [`RouteRequest::from_query`].
#[derive(Debug, Clone, Serialize)]
pub struct RouteQuery {
    pub start: String,
    pub goal: String,
    pub avoid_countries: Vec<String>,
    pub top_n: i64,
    pub time_weight: f64,
    pub price_weight: f64,
    pub allowed_modes: Vec<String>,
    pub prohibited_flag: String,
    pub restricted_flag: String,
    /// Free-text cargo description, matched against the regulation table.
    pub description: Option<String>,
}

impl RouteQuery {
    /// A query between two locations with the client's default settings.
    pub fn new(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            avoid_countries: Vec::new(),
            top_n: default_top_n(),
            time_weight: default_weight(),
            price_weight: default_weight(),
            allowed_modes: default_modes(),
            prohibited_flag: default_flag(),
            restricted_flag: default_flag(),
            description: None,
        }
    }

    /// Decode a query from a JSON object.
    ///
    /// Fields are decoded one at a time, so a value of the wrong type is a
    /// validation error naming that field. Missing fields take the client
    /// defaults; unknown fields are ignored.
    pub fn from_json(mut object: Map<String, Value>) -> Result<Self, EngineError> {
        let start: String = take(&mut object, "start")?
            .ok_or_else(|| EngineError::validation("start", "is required"))?;
        let goal: String = take(&mut object, "goal")?
            .ok_or_else(|| EngineError::validation("goal", "is required"))?;

        Ok(Self {
            start,
            goal,
            avoid_countries: take(&mut object, "avoid_countries")?.unwrap_or_default(),
            top_n: take(&mut object, "top_n")?.unwrap_or_else(default_top_n),
            time_weight: take(&mut object, "time_weight")?.unwrap_or_else(default_weight),
            price_weight: take(&mut object, "price_weight")?.unwrap_or_else(default_weight),
            allowed_modes: take(&mut object, "allowed_modes")?.unwrap_or_else(default_modes),
            prohibited_flag: take(&mut object, "prohibited_flag")?.unwrap_or_else(default_flag),
            restricted_flag: take(&mut object, "restricted_flag")?.unwrap_or_else(default_flag),
            description: take::<Option<String>>(&mut object, "description")?.flatten(),
        })
    }
}

fn take<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, EngineError> {
    object
        .remove(field)
        .map(|value| {
            serde_json::from_value(value).map_err(|e| EngineError::validation(field, e.to_string()))
        })
        .transpose()
}

/// A validated route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub avoid_countries: BTreeSet<CountryCode>,
    pub top_n: usize,
    pub weights: Weights,
    pub allowed_modes: BTreeSet<TransportMode>,
    pub prohibited_flag: Flag,
    pub restricted_flag: Flag,
    pub description: Option<String>,
}

impl RouteRequest {
    /// Validate and normalize a client query.
    ///
    /// Country codes are upper-cased and deduplicated, weights normalized,
    /// and `top_n` checked against `1..=max_top_n`.
    pub fn from_query(query: &RouteQuery, max_top_n: usize) -> Result<Self, EngineError> {
        let start = query.start.trim();
        if start.is_empty() {
            return Err(EngineError::validation("start", "must not be empty"));
        }
        let goal = query.goal.trim();
        if goal.is_empty() {
            return Err(EngineError::validation("goal", "must not be empty"));
        }
        if start == goal {
            return Err(EngineError::validation("goal", "must differ from start"));
        }

        if query.top_n < 1 || query.top_n > max_top_n as i64 {
            return Err(EngineError::validation(
                "top_n",
                format!("must be between 1 and {max_top_n}, got {}", query.top_n),
            ));
        }

        let weights = Weights::normalize(query.time_weight, query.price_weight)?;

        let avoid_countries = query
            .avoid_countries
            .iter()
            .map(|c| {
                CountryCode::parse_normalized(c).map_err(|e| {
                    EngineError::validation("avoid_countries", format!("{c:?}: {e}"))
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        if query.allowed_modes.is_empty() {
            return Err(EngineError::validation("allowed_modes", "must not be empty"));
        }
        let allowed_modes = query
            .allowed_modes
            .iter()
            .map(|m| {
                m.parse::<TransportMode>()
                    .map_err(|e| EngineError::validation("allowed_modes", e.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let prohibited_flag = parse_flag(&query.prohibited_flag, "prohibited_flag")?;
        let restricted_flag = parse_flag(&query.restricted_flag, "restricted_flag")?;

        let description = query
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            start: start.to_string(),
            goal: goal.to_string(),
            avoid_countries,
            top_n: query.top_n as usize,
            weights,
            allowed_modes,
            prohibited_flag,
            restricted_flag,
            description,
        })
    }

    /// Canonical string identifying the request's semantics.
    ///
    /// Two queries that validate to the same request share a key.
    pub fn cache_key(&self) -> String {
        let countries: Vec<&str> = self.avoid_countries.iter().map(|c| c.as_str()).collect();
        let modes: Vec<&str> = self.allowed_modes.iter().map(|m| m.as_str()).collect();
        format!(
            "{}|{}|{}|{}|{:016x}|{:016x}|{}|{}|{}|{}",
            self.start,
            self.goal,
            countries.join(","),
            self.top_n,
            self.weights.time.to_bits(),
            self.weights.price.to_bits(),
            modes.join(","),
            self.prohibited_flag,
            self.restricted_flag,
            self.description.as_deref().unwrap_or_default().to_lowercase(),
        )
    }
}

fn parse_flag(s: &str, field: &'static str) -> Result<Flag, EngineError> {
    s.parse::<Flag>().map_err(|e| match e {
        EngineError::Validation { message, .. } => EngineError::Validation { field, message },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cc(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn field_of(err: EngineError) -> &'static str {
        match err {
            EngineError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn weights_already_normalized_are_kept() {
        let w = Weights::normalize(0.25, 0.75).unwrap();
        assert_eq!(w.time(), 0.25);
        assert_eq!(w.price(), 0.75);
    }

    #[test]
    fn weights_renormalized_to_sum_one() {
        let w = Weights::normalize(0.2, 0.6).unwrap();
        assert!((w.time() - 0.25).abs() < 1e-12);
        assert!((w.price() - 0.75).abs() < 1e-12);
        assert!((w.time() + w.price() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weights_clamped_before_normalizing() {
        let w = Weights::normalize(3.0, 1.0).unwrap();
        assert_eq!(w.time(), 0.5);
        assert_eq!(w.price(), 0.5);

        let w = Weights::normalize(-1.0, 0.4).unwrap();
        assert_eq!(w.time(), 0.0);
        assert_eq!(w.price(), 1.0);
    }

    #[test]
    fn zero_weights_become_even_split() {
        let w = Weights::normalize(0.0, 0.0).unwrap();
        assert_eq!(w.time(), 0.5);
        assert_eq!(w.price(), 0.5);
    }

    #[test]
    fn non_finite_weights_rejected() {
        assert_eq!(field_of(Weights::normalize(f64::NAN, 0.5).unwrap_err()), "time_weight");
        assert_eq!(
            field_of(Weights::normalize(0.5, f64::INFINITY).unwrap_err()),
            "price_weight"
        );
    }

    #[test]
    fn flags_parse_case_insensitively() {
        assert_eq!("Strict".parse::<Flag>().unwrap(), Flag::Strict);
        assert_eq!("avoid".parse::<Flag>().unwrap(), Flag::Avoid);
        assert_eq!("ignore".parse::<Flag>().unwrap(), Flag::Ignore);
        assert_eq!("allow".parse::<Flag>().unwrap(), Flag::Ignore);
        assert!("maybe".parse::<Flag>().is_err());
    }

    #[test]
    fn valid_query_normalizes_fields() {
        let query = RouteQuery {
            avoid_countries: vec!["cn".into(), " CN".into(), "ru".into()],
            top_n: 2,
            time_weight: 0.2,
            price_weight: 0.2,
            allowed_modes: vec!["SEA".into(), "land".into(), "sea".into()],
            prohibited_flag: "strict".into(),
            restricted_flag: "ignore".into(),
            description: Some("  lithium batteries ".into()),
            ..RouteQuery::new(" Shanghai ", "Hamburg")
        };

        let req = RouteRequest::from_query(&query, 5).unwrap();
        assert_eq!(req.start, "Shanghai");
        assert_eq!(req.goal, "Hamburg");
        assert_eq!(
            req.avoid_countries.iter().copied().collect::<Vec<_>>(),
            vec![cc("CN"), cc("RU")]
        );
        assert_eq!(req.top_n, 2);
        assert_eq!(req.weights.time(), 0.5);
        assert_eq!(
            req.allowed_modes.iter().copied().collect::<Vec<_>>(),
            vec![TransportMode::Land, TransportMode::Sea]
        );
        assert_eq!(req.prohibited_flag, Flag::Strict);
        assert_eq!(req.restricted_flag, Flag::Ignore);
        assert_eq!(req.description.as_deref(), Some("lithium batteries"));
    }

    #[test]
    fn invalid_fields_are_named() {
        let base = RouteQuery::new("A", "B");

        let q = RouteQuery { start: " ".into(), ..base.clone() };
        assert_eq!(field_of(RouteRequest::from_query(&q, 5).unwrap_err()), "start");

        let q = RouteQuery { goal: "".into(), ..base.clone() };
        assert_eq!(field_of(RouteRequest::from_query(&q, 5).unwrap_err()), "goal");

        let q = RouteQuery { goal: "A".into(), ..base.clone() };
        assert_eq!(field_of(RouteRequest::from_query(&q, 5).unwrap_err()), "goal");

        for top_n in [0, -1, 6] {
            let q = RouteQuery { top_n, ..base.clone() };
            assert_eq!(field_of(RouteRequest::from_query(&q, 5).unwrap_err()), "top_n");
        }

        let q = RouteQuery { avoid_countries: vec!["CHN".into()], ..base.clone() };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "avoid_countries"
        );

        let q = RouteQuery { allowed_modes: vec![], ..base.clone() };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "allowed_modes"
        );

        let q = RouteQuery { allowed_modes: vec!["rail".into()], ..base.clone() };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "allowed_modes"
        );

        let q = RouteQuery { prohibited_flag: "never".into(), ..base.clone() };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "prohibited_flag"
        );

        let q = RouteQuery { restricted_flag: "".into(), ..base.clone() };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "restricted_flag"
        );

        let q = RouteQuery { time_weight: f64::NAN, ..base };
        assert_eq!(
            field_of(RouteRequest::from_query(&q, 5).unwrap_err()),
            "time_weight"
        );
    }

    #[test]
    fn top_n_bound_follows_config() {
        let q = RouteQuery { top_n: 4, ..RouteQuery::new("A", "B") };
        assert!(RouteRequest::from_query(&q, 5).is_ok());
        assert!(RouteRequest::from_query(&q, 3).is_err());
    }

    #[test]
    fn equivalent_queries_share_cache_key() {
        let a = RouteQuery {
            avoid_countries: vec!["de".into(), "FR".into()],
            allowed_modes: vec!["sea".into(), "land".into()],
            time_weight: 1.0,
            price_weight: 1.0,
            ..RouteQuery::new("A", "B")
        };
        let b = RouteQuery {
            avoid_countries: vec!["FR".into(), "DE".into(), "fr".into()],
            allowed_modes: vec!["land".into(), "sea".into()],
            time_weight: 0.5,
            price_weight: 0.5,
            ..RouteQuery::new("A", "B")
        };
        let c = RouteQuery { top_n: 1, ..b.clone() };

        let key = |q: &RouteQuery| RouteRequest::from_query(q, 5).unwrap().cache_key();
        assert_eq!(key(&a), key(&b));
        assert_ne!(key(&b), key(&c));
    }

    fn decode(json: Value) -> Result<RouteQuery, EngineError> {
        match json {
            Value::Object(object) => RouteQuery::from_json(object),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn query_defaults_from_json() {
        let q = decode(json!({"start": "A", "goal": "B", "description": null})).unwrap();
        assert_eq!(q.top_n, 3);
        assert_eq!(q.time_weight, 0.5);
        assert_eq!(q.allowed_modes, vec!["land", "sea", "air"]);
        assert_eq!(q.prohibited_flag, "avoid");
        assert!(q.avoid_countries.is_empty());
        assert!(q.description.is_none());
    }

    #[test]
    fn query_fields_decoded_from_json() {
        let q = decode(json!({
            "start": "Shanghai",
            "goal": "Hamburg",
            "avoid_countries": ["RU"],
            "top_n": 2,
            "time_weight": 1,
            "price_weight": 0.25,
            "allowed_modes": ["sea"],
            "prohibited_flag": "strict",
            "restricted_flag": "ignore",
            "description": "textiles",
            "unused": true
        }))
        .unwrap();
        assert_eq!(q.avoid_countries, vec!["RU"]);
        assert_eq!(q.top_n, 2);
        assert_eq!(q.time_weight, 1.0);
        assert_eq!(q.price_weight, 0.25);
        assert_eq!(q.allowed_modes, vec!["sea"]);
        assert_eq!(q.restricted_flag, "ignore");
        assert_eq!(q.description.as_deref(), Some("textiles"));
    }

    #[test]
    fn wrongly_typed_json_fields_are_named() {
        let cases = [
            (json!({"goal": "B"}), "start"),
            (json!({"start": "A"}), "goal"),
            (json!({"start": 7, "goal": "B"}), "start"),
            (json!({"start": "A", "goal": "B", "top_n": 2.5}), "top_n"),
            (json!({"start": "A", "goal": "B", "top_n": "3"}), "top_n"),
            (json!({"start": "A", "goal": "B", "time_weight": "fast"}), "time_weight"),
            (json!({"start": "A", "goal": "B", "price_weight": null}), "price_weight"),
            (json!({"start": "A", "goal": "B", "avoid_countries": "RU"}), "avoid_countries"),
            (json!({"start": "A", "goal": "B", "allowed_modes": [1]}), "allowed_modes"),
            (json!({"start": "A", "goal": "B", "prohibited_flag": true}), "prohibited_flag"),
            (json!({"start": "A", "goal": "B", "restricted_flag": 0}), "restricted_flag"),
            (json!({"start": "A", "goal": "B", "description": 12}), "description"),
        ];

        for (json, field) in cases {
            assert_eq!(field_of(decode(json).unwrap_err()), field);
        }
    }
}
