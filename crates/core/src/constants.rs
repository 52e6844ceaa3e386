//! Constants used throughout the Terrace core crate.
//!
//! Map defaults, schema limits and loading-flag names live here so pages and
//! validation agree on them.

/// Zoom level used for every programmatic view change.
pub const DEFAULT_ZOOM: u8 = 7;

/// Browse-mode fallback centre when a list has no places.
pub const DEFAULT_CENTER: (f64, f64) = (52.0, -0.2);

/// Initial centre of the add-list map.
pub const DRAFT_CENTER: (f64, f64) = (52.0, 0.0);

/// Opacity of committed draft markers while a pending place is open.
pub const DIMMED_OPACITY: f32 = 0.5;

/// Minimum length of list and place names.
pub const NAME_MIN_LEN: usize = 4;

/// Maximum length of list and place names.
pub const NAME_MAX_LEN: usize = 48;

/// Minimum length of list and place descriptions.
pub const DESCRIPTION_MIN_LEN: usize = 4;

/// Maximum length of list and place descriptions.
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// Fewest places a submittable list may carry.
pub const LIST_MIN_PLACES: usize = 2;

/// Most places a submittable list may carry.
pub const LIST_MAX_PLACES: usize = 100;

/// File extensions accepted for thumbnail and banner URLs.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Error code the API uses for schema rejections.
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION";

/// First cursor of the per-user list listing.
pub const FIRST_PAGE_CURSOR: u64 = 1;

/// Default number of lists requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Loading flag raised while a list is fetched on the browse page.
pub const LOADING_LIST: &str = "list";

/// Loading flag raised while a place detail is fetched.
pub const LOADING_PLACE: &str = "place";

/// Loading flag raised while the profile page fetches its user.
pub const LOADING_USER: &str = "fetching-user";

/// Loading flag raised while a draft is submitted.
pub const LOADING_ADDING_LIST: &str = "adding-list";

/// Loading flag raised while the top bar searches.
pub const LOADING_SEARCH: &str = "search";
