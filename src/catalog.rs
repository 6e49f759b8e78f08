use crate::error::{PlannerError, Result};
use std::collections::BTreeMap;

/// Scalar economics of one planning period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Economics {
    pub burrito_price: f64,
    pub ingredient_cost: f64,
    pub truck_cost: f64,
}

/// Candidate location where a truck may be deployed
#[derive(Debug, Clone, PartialEq)]
pub struct TruckSite {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Location with potential customer demand
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSite {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub demand: f64,
}

/// Composite key of a demand-truck link
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKey {
    pub demand: String,
    pub truck: String,
}

impl LinkKey {
    pub fn new(demand: impl Into<String>, truck: impl Into<String>) -> Self {
        Self {
            demand: demand.into(),
            truck: truck.into(),
        }
    }
}

/// Demand a truck could capture from a demand site. Only reachable pairs
/// (scaled demand > 0) are kept; unreachable pairs never enter the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandTruckLink {
    pub scaled_demand: f64,
}

/// Validated problem catalog. BTreeMaps keep iteration order deterministic
/// so the model is built identically run to run.
#[derive(Debug, Clone)]
pub struct Catalog {
    economics: Economics,
    truck_sites: BTreeMap<String, TruckSite>,
    demand_sites: BTreeMap<String, DemandSite>,
    links: BTreeMap<LinkKey, DemandTruckLink>,
}

impl Catalog {
    /// Assembles a catalog from loaded entities.
    ///
    /// # Errors
    /// Returns `PlannerError::Catalog` on duplicate site or link keys and
    /// on links referencing unknown sites.
    pub fn new(
        economics: Economics,
        truck_sites: Vec<TruckSite>,
        demand_sites: Vec<DemandSite>,
        links: Vec<(LinkKey, DemandTruckLink)>,
    ) -> Result<Self> {
        let mut trucks = BTreeMap::new();
        for site in truck_sites {
            if trucks.contains_key(&site.id) {
                return Err(PlannerError::Catalog(format!(
                    "duplicate truck site id: {}",
                    site.id
                )));
            }
            trucks.insert(site.id.clone(), site);
        }

        let mut demands = BTreeMap::new();
        for site in demand_sites {
            if demands.contains_key(&site.id) {
                return Err(PlannerError::Catalog(format!(
                    "duplicate demand site id: {}",
                    site.id
                )));
            }
            demands.insert(site.id.clone(), site);
        }

        let mut link_map = BTreeMap::new();
        for (key, link) in links {
            if !demands.contains_key(&key.demand) {
                return Err(PlannerError::Catalog(format!(
                    "link ({}, {}) references unknown demand site",
                    key.demand, key.truck
                )));
            }
            if !trucks.contains_key(&key.truck) {
                return Err(PlannerError::Catalog(format!(
                    "link ({}, {}) references unknown truck site",
                    key.demand, key.truck
                )));
            }
            if link_map.insert(key.clone(), link).is_some() {
                return Err(PlannerError::Catalog(format!(
                    "duplicate link key: ({}, {})",
                    key.demand, key.truck
                )));
            }
        }

        Ok(Self {
            economics,
            truck_sites: trucks,
            demand_sites: demands,
            links: link_map,
        })
    }

    pub fn economics(&self) -> &Economics {
        &self.economics
    }

    pub fn truck_sites(&self) -> &BTreeMap<String, TruckSite> {
        &self.truck_sites
    }

    pub fn demand_sites(&self) -> &BTreeMap<String, DemandSite> {
        &self.demand_sites
    }

    pub fn links(&self) -> &BTreeMap<LinkKey, DemandTruckLink> {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics() -> Economics {
        Economics {
            burrito_price: 5.0,
            ingredient_cost: 2.0,
            truck_cost: 50.0,
        }
    }

    fn truck(id: &str, x: f64, y: f64) -> TruckSite {
        TruckSite {
            id: id.to_string(),
            x,
            y,
        }
    }

    fn demand(id: &str, x: f64, y: f64, demand: f64) -> DemandSite {
        DemandSite {
            id: id.to_string(),
            x,
            y,
            demand,
        }
    }

    #[test]
    fn builds_catalog_with_valid_links() {
        let catalog = Catalog::new(
            economics(),
            vec![truck("t1", 0.0, 0.0)],
            vec![demand("d1", 1.0, 1.0, 100.0)],
            vec![(LinkKey::new("d1", "t1"), DemandTruckLink { scaled_demand: 80.0 })],
        )
        .unwrap();

        assert_eq!(catalog.truck_sites().len(), 1);
        assert_eq!(catalog.demand_sites().len(), 1);
        assert_eq!(catalog.links().len(), 1);
    }

    #[test]
    fn rejects_duplicate_truck_id() {
        let result = Catalog::new(
            economics(),
            vec![truck("t1", 0.0, 0.0), truck("t1", 2.0, 2.0)],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(PlannerError::Catalog(_))));
    }

    #[test]
    fn rejects_duplicate_link_key() {
        let result = Catalog::new(
            economics(),
            vec![truck("t1", 0.0, 0.0)],
            vec![demand("d1", 1.0, 1.0, 100.0)],
            vec![
                (LinkKey::new("d1", "t1"), DemandTruckLink { scaled_demand: 80.0 }),
                (LinkKey::new("d1", "t1"), DemandTruckLink { scaled_demand: 70.0 }),
            ],
        );
        assert!(matches!(result, Err(PlannerError::Catalog(_))));
    }

    #[test]
    fn rejects_link_to_unknown_truck() {
        let result = Catalog::new(
            economics(),
            vec![truck("t1", 0.0, 0.0)],
            vec![demand("d1", 1.0, 1.0, 100.0)],
            vec![(LinkKey::new("d1", "t9"), DemandTruckLink { scaled_demand: 80.0 })],
        );
        assert!(matches!(result, Err(PlannerError::Catalog(_))));
    }

    #[test]
    fn rejects_link_to_unknown_demand() {
        let result = Catalog::new(
            economics(),
            vec![truck("t1", 0.0, 0.0)],
            vec![demand("d1", 1.0, 1.0, 100.0)],
            vec![(LinkKey::new("d9", "t1"), DemandTruckLink { scaled_demand: 80.0 })],
        );
        assert!(matches!(result, Err(PlannerError::Catalog(_))));
    }
}
