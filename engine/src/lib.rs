pub mod logging;
pub mod scene;
pub mod util;
