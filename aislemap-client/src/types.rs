use aislemap_core::ProductLocationFilter;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Endpoint paths, relative to the server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Product list (GET) and location changes (POST).
    pub locations: String,
    pub groups: String,
    pub aisles: String,
    pub map_save: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            locations: "/api/maps/m/locations/".to_string(),
            groups: "/api/maps/m/locations/groups/".to_string(),
            aisles: "/api/maps/aisles/".to_string(),
            map_save: "/api/maps/m/edit/".to_string(),
        }
    }
}

/// Logged-in session used for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub session_id: Option<String>,
    /// Required for writes.
    pub csrf_token: Option<String>,
}

impl Session {
    pub(crate) fn cookie_header(&self) -> Option<String> {
        let mut cookies = Vec::new();
        if let Some(id) = &self.session_id {
            cookies.push(format!("sessionid={id}"));
        }
        if let Some(token) = &self.csrf_token {
            cookies.push(format!("csrftoken={token}"));
        }
        (!cookies.is_empty()).then(|| cookies.join("; "))
    }
}

/// Search parameters for the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub filter: ProductLocationFilter,
    pub name: String,
    pub vendor: String,
    /// Subcategory id; zero or less means any.
    pub subcategory: i64,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            filter: ProductLocationFilter::All,
            name: String::new(),
            vendor: String::new(),
            subcategory: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Query string pairs; `valid_at` must already be in wire format.
    pub fn to_params(&self, valid_at: &str) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let name = self.name.trim();
        if !name.is_empty() {
            params.push(("q", name.to_string()));
        }
        let vendor = self.vendor.trim();
        if !vendor.is_empty() {
            params.push(("vendor", vendor.to_string()));
        }
        if self.subcategory > 0 {
            params.push(("subcategory", self.subcategory.to_string()));
        }
        params.push(("validAt", valid_at.to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        params.push(("filter", self.filter.to_string()));
        params
    }
}
