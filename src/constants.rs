/// Dataset file name suffixes, prefixed with `round{r}-day{d}_` on disk
pub const PROBLEM_FILE: &str = "problem_data.csv";
pub const TRUCK_NODE_FILE: &str = "truck_node_data.csv";
pub const DEMAND_NODE_FILE: &str = "demand_node_data.csv";
pub const DEMAND_TRUCK_FILE: &str = "demand_truck_data.csv";

/// Expected headers in the dataset files
pub const PROBLEM_HEADERS: [&str; 3] = ["burrito_price", "ingredient_cost", "truck_cost"];
pub const TRUCK_NODE_HEADERS: [&str; 3] = ["index", "x", "y"];
pub const DEMAND_NODE_HEADERS: [&str; 4] = ["index", "x", "y", "demand"];
pub const DEMAND_TRUCK_HEADERS: [&str; 3] =
    ["demand_node_index", "truck_node_index", "scaled_demand"];

/// Base map image in the data folder and the rendered output next to it
pub const BASE_IMAGE_FILE: &str = "gurobiville.png";
pub const SOLUTION_IMAGE_FILE: &str = "gurobiville-with-solution.png";
pub const REPORT_FILE: &str = "solution.json";

/// Map-to-pixel conversion defaults
pub const DEFAULT_SCALE: f64 = 1.42;
pub const DEFAULT_SHIFT: f64 = 0.0;

/// Marker geometry [px]
pub const MARKER_TRUCK_SIZE: i32 = 6;
pub const MARKER_DEMAND_SIZE: i32 = 5;
pub const LINE_SIZE: i32 = 3;

/// Marker colors (RGB)
pub const MARKER_TRUCK_COLOR: [u8; 3] = [255, 0, 0];
pub const MARKER_DEMAND_COLOR: [u8; 3] = [0, 255, 0];
pub const LINE_COLOR: [u8; 3] = [50, 50, 50];
pub const LABEL_COLOR: [u8; 3] = [0, 0, 0];

/// Variable values above this count as 1 when reading the solution
pub const DEFAULT_SOLUTION_THRESHOLD: f64 = 0.5;
