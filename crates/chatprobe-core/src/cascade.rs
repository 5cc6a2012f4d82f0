use std::future::Future;

/// A single element-locating strategy.
///
/// The target page's markup is an untrusted, versioned dependency: class
/// names change between deploys and are sometimes obfuscated. Cascades
/// therefore mix markup-based candidates with a geometric fallback that
/// needs no markup knowledge at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Plain CSS selector; first matching element wins.
    Css(&'static str),
    /// Elements of `tag` whose rendered text contains `needle`.
    TextContains {
        tag: &'static str,
        needle: &'static str,
    },
    /// Scan every button and take the first whose bounding box origin lies
    /// past (`min_x`, `min_y`) — chat toggles sit in the bottom-right corner.
    BottomRight { min_x: f64, min_y: f64 },
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Css(selector) => write!(f, "{}", selector),
            Strategy::TextContains { tag, needle } => {
                write!(f, "{}:has-text('{}')", tag, needle)
            }
            Strategy::BottomRight { min_x, min_y } => {
                write!(f, "button @ bottom-right (x > {}, y > {})", min_x, min_y)
            }
        }
    }
}

/// A named, ordered list of strategies tried in sequence until one matches.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    pub feature: &'static str,
    pub strategies: &'static [Strategy],
}

/// A winning cascade candidate and what it located.
#[derive(Debug)]
pub struct Hit<T> {
    pub strategy_index: usize,
    pub strategy: Strategy,
    pub value: T,
}

impl Cascade {
    /// Evaluate candidates in order; the first probe yielding a match wins.
    ///
    /// A probe error counts as no match for that candidate and is skipped
    /// silently (malformed selectors and stale elements must never abort a
    /// feature check). Exhaustion yields `None`; evaluation itself never
    /// fails.
    pub async fn evaluate<T, E, F, Fut>(&self, mut probe: F) -> Option<Hit<T>>
    where
        F: FnMut(Strategy) -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, E>>,
        E: std::fmt::Display,
    {
        for (index, strategy) in self.strategies.iter().enumerate() {
            match probe(*strategy).await {
                Ok(Some(value)) => {
                    tracing::debug!(
                        "{}: candidate {} matched ({:?})",
                        self.feature,
                        index,
                        strategy
                    );
                    return Some(Hit {
                        strategy_index: index,
                        strategy: *strategy,
                        value,
                    });
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(
                        "{}: candidate {} errored, skipping: {}",
                        self.feature,
                        index,
                        e
                    );
                    continue;
                }
            }
        }

        tracing::debug!("{}: cascade exhausted, no match", self.feature);
        None
    }
}

/// Geometric fallback predicate: is a box origin in the bottom-right region?
pub fn in_bottom_right(x: f64, y: f64, min_x: f64, min_y: f64) -> bool {
    x > min_x && y > min_y
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASCADE: Cascade = Cascade {
        feature: "test_feature",
        strategies: &[
            Strategy::Css("#first"),
            Strategy::Css("#second"),
            Strategy::Css("#third"),
        ],
    };

    #[tokio::test]
    async fn test_first_matching_candidate_wins() {
        let hit = CASCADE
            .evaluate(|strategy| async move {
                Ok::<_, std::io::Error>(match strategy {
                    Strategy::Css("#second") => Some("matched second"),
                    Strategy::Css("#third") => Some("matched third"),
                    _ => None,
                })
            })
            .await
            .expect("cascade should match");

        assert_eq!(hit.strategy_index, 1);
        assert_eq!(hit.value, "matched second");
    }

    #[tokio::test]
    async fn test_erroring_candidates_are_skipped() {
        let hit = CASCADE
            .evaluate(|strategy| async move {
                match strategy {
                    Strategy::Css("#first") => Err(std::io::Error::other("malformed selector")),
                    Strategy::Css("#third") => Ok(Some(42)),
                    _ => Ok(None),
                }
            })
            .await
            .expect("later candidate should still match");

        assert_eq!(hit.strategy_index, 2);
        assert_eq!(hit.value, 42);
    }

    #[tokio::test]
    async fn test_exhausted_cascade_yields_none() {
        let hit = CASCADE
            .evaluate(|_| async { Ok::<Option<()>, std::io::Error>(None) })
            .await;

        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_candidates_are_tried_in_declared_order() {
        let mut seen = Vec::new();
        let _ = CASCADE
            .evaluate(|strategy| {
                seen.push(strategy);
                async { Ok::<Option<()>, std::io::Error>(None) }
            })
            .await;

        assert_eq!(
            seen,
            vec![
                Strategy::Css("#first"),
                Strategy::Css("#second"),
                Strategy::Css("#third"),
            ]
        );
    }

    #[test]
    fn test_strategy_display_is_selector_like() {
        assert_eq!(Strategy::Css("#chat-button").to_string(), "#chat-button");
        assert_eq!(
            Strategy::TextContains {
                tag: "button",
                needle: "Send",
            }
            .to_string(),
            "button:has-text('Send')"
        );
        assert_eq!(
            Strategy::BottomRight {
                min_x: 1000.0,
                min_y: 600.0,
            }
            .to_string(),
            "button @ bottom-right (x > 1000, y > 600)"
        );
    }

    #[test]
    fn test_bottom_right_predicate() {
        // Known button in the bottom-right quadrant of a 1280x800 viewport.
        assert!(in_bottom_right(1180.0, 710.0, 1000.0, 600.0));

        // Top-left, bottom-left, top-right are all rejected.
        assert!(!in_bottom_right(20.0, 20.0, 1000.0, 600.0));
        assert!(!in_bottom_right(20.0, 710.0, 1000.0, 600.0));
        assert!(!in_bottom_right(1180.0, 20.0, 1000.0, 600.0));

        // Boundary is exclusive.
        assert!(!in_bottom_right(1000.0, 600.0, 1000.0, 600.0));
    }
}
