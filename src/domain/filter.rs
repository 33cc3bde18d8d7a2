use crate::entities::{filter::FilterCriteria, listing::Listing};

/// Returns `true` when a listing satisfies every criterion.
pub fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    (criteria.location.is_empty() || listing.location.to_lowercase().contains(&criteria.location))
        && criteria.price.contains(i64::from(listing.price))
        && criteria.property_type.matches(listing.property_type.as_str())
        && criteria.tenant_preference.matches(listing.tenant_preference.as_str())
}

/// Selects the listings matching `criteria`, keeping input order.
pub fn filter_listings<'a>(listings: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    listings.iter().filter(|l| matches(l, criteria)).collect()
}

/// A listing set together with the criteria that narrow it.
///
/// The visible subset is derived again whenever either input is replaced.
#[derive(Debug, Clone, Default)]
pub struct FilteredView {
    listings: Vec<Listing>,
    criteria: FilterCriteria,
    visible: Vec<usize>,
}

impl FilteredView {
    pub fn new(listings: Vec<Listing>, criteria: FilterCriteria) -> Self {
        let mut view = FilteredView { listings, criteria, visible: Vec::new() };
        view.recompute();
        view
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn replace_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.recompute();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn visible(&self) -> impl Iterator<Item = &Listing> {
        self.visible.iter().map(|&i| &self.listings[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn into_visible(self) -> Vec<Listing> {
        let keep = self.visible;
        self.listings
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep.binary_search(i).is_ok())
            .map(|(_, listing)| listing)
            .collect()
    }

    fn recompute(&mut self) {
        self.visible = self
            .listings
            .iter()
            .enumerate()
            .filter(|(_, listing)| matches(listing, &self.criteria))
            .map(|(i, _)| i)
            .collect();
    }
}
