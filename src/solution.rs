use crate::catalog::Catalog;
use crate::error::{PlannerError, Result};
use crate::model::ModelVars;

use chrono::Utc;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Demand site credited to a truck, coordinates copied for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ServedCustomer {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub scaled_demand: f64,
}

/// Deployed truck with the demand sites it serves
#[derive(Debug, Clone, Serialize)]
pub struct SolutionTruck {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub customers: Vec<ServedCustomer>,
}

/// Reporting-ready solution. `profit` and `burritos_sold` restate the
/// solver's objective value, not a recomputation from the truck grouping.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementSolution {
    pub trucks: Vec<SolutionTruck>,
    pub burritos_sold: f64,
    pub profit: f64,
}

/// Reads solved variable values back into the reporting structure.
///
/// A link whose assignment is truthy while its truck stayed inactive
/// contributes nothing; that matches the exclusivity constraint semantics,
/// where assignment without activation is not a real assignment.
///
/// # Errors
/// `PlannerError::Extraction` if a truthy variable references an id absent
/// from the catalog. The builder makes this unreachable; hitting it means
/// the model and solution went out of sync.
pub fn extract_solution(
    solution: &dyn good_lp::Solution,
    catalog: &Catalog,
    vars: &ModelVars,
    burritos_sold: f64,
    profit: f64,
    threshold: f64,
) -> Result<PlacementSolution> {
    let mut trucks: BTreeMap<String, SolutionTruck> = BTreeMap::new();
    for (id, &active) in &vars.truck_active {
        if solution.value(active) <= threshold {
            continue;
        }
        let site = catalog.truck_sites().get(id).ok_or_else(|| {
            PlannerError::Extraction(format!("active truck '{}' is not in the catalog", id))
        })?;
        trucks.insert(
            id.clone(),
            SolutionTruck {
                id: id.clone(),
                x: site.x,
                y: site.y,
                customers: Vec::new(),
            },
        );
    }

    for (key, &assign) in &vars.assign {
        if solution.value(assign) <= threshold {
            continue;
        }
        if !catalog.truck_sites().contains_key(&key.truck) {
            return Err(PlannerError::Extraction(format!(
                "assignment ({}, {}) references unknown truck site",
                key.demand, key.truck
            )));
        }
        let demand = catalog.demand_sites().get(&key.demand).ok_or_else(|| {
            PlannerError::Extraction(format!(
                "assignment ({}, {}) references unknown demand site",
                key.demand, key.truck
            ))
        })?;
        let link = catalog.links().get(key).ok_or_else(|| {
            PlannerError::Extraction(format!(
                "assignment ({}, {}) has no catalog link",
                key.demand, key.truck
            ))
        })?;

        let Some(truck) = trucks.get_mut(&key.truck) else {
            continue; // assigned but not activated
        };
        truck.customers.push(ServedCustomer {
            id: demand.id.clone(),
            x: demand.x,
            y: demand.y,
            scaled_demand: link.scaled_demand,
        });
    }

    Ok(PlacementSolution {
        trucks: order_for_report(trucks.into_values().collect()),
        burritos_sold,
        profit,
    })
}

/// Stable report order: ascending by x+y, ties keep input order
pub fn order_for_report(trucks: Vec<SolutionTruck>) -> Vec<SolutionTruck> {
    trucks
        .into_iter()
        .sorted_by(|a, b| (a.x + a.y).total_cmp(&(b.x + b.y)))
        .collect()
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    profit: f64,
    burritos_sold: f64,
    trucks: &'a [SolutionTruck],
}

impl PlacementSolution {
    /// Writes the solution as a JSON report.
    pub fn save_report<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let report = Report {
            generated_at: Utc::now().to_rfc3339(),
            profit: self.profit,
            burritos_sold: self.burritos_sold,
            trucks: &self.trucks,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        Ok(())
    }
}
