//
//  redmine-cli
//  api/common/include.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Include Sets
//!
//! Redmine omits nested associations from single-object responses unless
//! they are requested through the `include` query parameter, e.g.
//! `GET /issues/1.json?include=journals,relations`. Each resource that
//! supports it defines a struct of boolean flags implementing [`IncludeSet`].

use super::Params;

/// Flags that translate into the `include` query parameter.
///
/// Implementors only list their flags; the trait sorts the enabled names
/// lexicographically so the parameter is deterministic.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::{IncludeSet, Params};
///
/// struct Extras {
///     zeta: bool,
///     alpha: bool,
/// }
///
/// impl IncludeSet for Extras {
///     fn flags(&self) -> Vec<(&'static str, bool)> {
///         vec![("zeta", self.zeta), ("alpha", self.alpha)]
///     }
/// }
///
/// let extras = Extras { zeta: true, alpha: true };
/// assert_eq!(extras.to_param().as_deref(), Some("alpha,zeta"));
///
/// let none = Extras { zeta: false, alpha: false };
/// let mut params = Params::new();
/// none.apply(&mut params);
/// assert!(params.is_empty());
/// ```
pub trait IncludeSet {
    /// Every flag name paired with whether it is enabled.
    fn flags(&self) -> Vec<(&'static str, bool)>;

    /// Names of the enabled flags in lexicographic order.
    fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .flags()
            .into_iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
            .collect();
        names.sort_unstable();
        names
    }

    /// The comma-joined parameter value, or `None` when nothing is enabled.
    fn to_param(&self) -> Option<String> {
        let names = self.names();
        (!names.is_empty()).then(|| names.join(","))
    }

    /// Adds `include` to `params` when at least one flag is enabled.
    fn apply(&self, params: &mut Params) {
        if let Some(value) = self.to_param() {
            params.set("include", value);
        }
    }
}
