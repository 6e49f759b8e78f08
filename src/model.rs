use crate::catalog::{Catalog, LinkKey};
use crate::constants::DEFAULT_SOLUTION_THRESHOLD;
use crate::error::{PlannerError, Result, SolverStatus};
use crate::solution::{PlacementSolution, extract_solution};

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, coin_cbc,
    solvers::coin_cbc::CoinCbcProblem, variable,
};
use std::collections::BTreeMap;

/// Solver settings passed through to the engine
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Variable values above this count as 1 when reading the solution
    pub solution_threshold: f64,
    /// CBC time limit in seconds; None lets the solver run to optimality
    pub time_limit_s: Option<f64>,
    /// Forward the CBC log to stdout
    pub log_solver: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            solution_threshold: DEFAULT_SOLUTION_THRESHOLD,
            time_limit_s: None,
            log_solver: false,
        }
    }
}

impl From<&crate::config::SolverConfig> for SolveOptions {
    fn from(config: &crate::config::SolverConfig) -> Self {
        Self {
            solution_threshold: config.solution_threshold,
            time_limit_s: config.time_limit_s,
            log_solver: config.log_solver,
        }
    }
}

/// Decision variables of one placement model, keyed by catalog identity.
///
/// `served` is the linearized product `assign * truck_active` (AND gate):
/// CBC accepts only linear constraints, so the bilinear exclusivity and
/// objective terms are expressed through it.
pub struct ModelVars {
    pub truck_active: BTreeMap<String, Variable>,
    pub assign: BTreeMap<LinkKey, Variable>,
    pub served: BTreeMap<LinkKey, Variable>,
}

/// Builds the placement model from the catalog, solves it and extracts the
/// reporting structure.
///
/// # Errors
/// `PlannerError::Model` on inconsistent catalog data reaching the builder,
/// `PlannerError::Solver` when the engine reports no usable solution, and
/// `PlannerError::Extraction` on a builder/solver contract mismatch.
pub fn solve_placement(catalog: &Catalog, opt: &SolveOptions) -> Result<PlacementSolution> {
    validate_catalog(catalog)?;

    let mut vars = ProblemVariables::new();
    let model_vars = create_decision_variables(&mut vars, catalog);
    let (burritos_sold, profit) = build_objective(catalog, &model_vars);

    let linked_demands: std::collections::BTreeSet<&str> =
        catalog.links().keys().map(|k| k.demand.as_str()).collect();
    log::info!(
        "model built: {} truck variables, {} assignment variables, {} constraints",
        model_vars.truck_active.len(),
        model_vars.assign.len(),
        3 * model_vars.served.len() + linked_demands.len()
    );

    let mut model = vars.maximise(profit.clone()).using(coin_cbc);
    model.set_parameter("logLevel", if opt.log_solver { "1" } else { "0" });
    if let Some(limit) = opt.time_limit_s {
        model.set_parameter("seconds", &limit.to_string());
    }
    let model = add_constraints(model, catalog, &model_vars);

    log::info!("start solving placement model...");
    let sol = model.solve().map_err(map_resolution_error)?;

    // Restate the objective from solver values; recomputing from the
    // extracted grouping would drift under solver tolerance rounding.
    let profit_value = sol.eval(&profit);
    let burritos_value = sol.eval(&burritos_sold);

    let result = extract_solution(
        &sol,
        catalog,
        &model_vars,
        burritos_value,
        profit_value,
        opt.solution_threshold,
    )?;

    log::info!(
        "solved: {} trucks active, {:.0} burritos sold, profit {:.2}",
        result.trucks.len(),
        result.burritos_sold,
        result.profit
    );
    Ok(result)
}

/// Catalog construction already guarantees these; a violation here means a
/// caller bypassed `Catalog::new`.
fn validate_catalog(catalog: &Catalog) -> Result<()> {
    for (key, link) in catalog.links() {
        if !catalog.demand_sites().contains_key(&key.demand) {
            return Err(PlannerError::Model(format!(
                "link ({}, {}) references unknown demand site",
                key.demand, key.truck
            )));
        }
        if !catalog.truck_sites().contains_key(&key.truck) {
            return Err(PlannerError::Model(format!(
                "link ({}, {}) references unknown truck site",
                key.demand, key.truck
            )));
        }
        if link.scaled_demand <= 0.0 {
            return Err(PlannerError::Model(format!(
                "link ({}, {}) has non-positive scaled demand {}",
                key.demand, key.truck, link.scaled_demand
            )));
        }
    }
    Ok(())
}

/// Decision variables:
/// - truck_active[t] in {0,1} per truck site
/// - assign[d,t] in {0,1} per surviving link
/// - served[d,t] in {0,1}, the assign[d,t] * truck_active[t] product
fn create_decision_variables(vars: &mut ProblemVariables, catalog: &Catalog) -> ModelVars {
    let mut truck_active = BTreeMap::new();
    for id in catalog.truck_sites().keys() {
        truck_active.insert(id.clone(), vars.add(variable().binary()));
    }

    let mut assign = BTreeMap::new();
    let mut served = BTreeMap::new();
    for key in catalog.links().keys() {
        assign.insert(key.clone(), vars.add(variable().binary()));
        served.insert(key.clone(), vars.add(variable().binary()));
    }

    ModelVars {
        truck_active,
        assign,
        served,
    }
}

/// Objective terms, both kept for restating after the solve:
/// burritos_sold = sum over links of served[d,t] * scaled_demand[d,t]
/// profit = burritos_sold * (price - ingredient_cost) - truck_cost * active trucks
fn build_objective(catalog: &Catalog, model_vars: &ModelVars) -> (Expression, Expression) {
    let eco = catalog.economics();
    let margin = eco.burrito_price - eco.ingredient_cost;

    let mut burritos_sold = Expression::from(0.0);
    let mut profit = Expression::from(0.0);
    for (key, link) in catalog.links() {
        let served = model_vars.served[key];
        burritos_sold += link.scaled_demand * served;
        profit += margin * link.scaled_demand * served;
    }
    for active in model_vars.truck_active.values() {
        profit += -eco.truck_cost * *active;
    }

    (burritos_sold, profit)
}

fn add_constraints(
    mut model: CoinCbcProblem,
    catalog: &Catalog,
    model_vars: &ModelVars,
) -> CoinCbcProblem {
    // served[d,t] = assign[d,t] AND truck_active[t]
    for key in catalog.links().keys() {
        model = add_and_gate(
            model,
            model_vars.served[key],
            model_vars.assign[key],
            model_vars.truck_active[&key.truck],
        );
    }

    // nearest-truck exclusivity: at most one truck is credited per demand site
    let mut per_demand: BTreeMap<&str, Vec<Variable>> = BTreeMap::new();
    for key in catalog.links().keys() {
        per_demand
            .entry(key.demand.as_str())
            .or_default()
            .push(model_vars.served[key]);
    }
    for (_, served) in per_demand {
        let sum: Expression = served.into_iter().sum();
        model = model.with(sum.leq(1.0));
    }

    model
}

/// McCormick/AND-gate linearization of `served = assign * active` for two
/// binaries; the lower bound served >= 0 comes from the binary domain.
fn add_and_gate(
    model: CoinCbcProblem,
    served: Variable,
    assign: Variable,
    active: Variable,
) -> CoinCbcProblem {
    model
        .with((served - assign).leq(0.0))
        .with((served - active).leq(0.0))
        .with((assign + active - served).leq(1.0))
}

fn map_resolution_error(err: ResolutionError) -> PlannerError {
    let status = match err {
        ResolutionError::Infeasible => SolverStatus::Infeasible,
        ResolutionError::Unbounded => SolverStatus::Unbounded,
        _ => SolverStatus::Error,
    };
    PlannerError::Solver {
        status,
        message: err.to_string(),
    }
}
