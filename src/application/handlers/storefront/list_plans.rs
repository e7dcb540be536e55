//! ListPlansHandler - Query handler for the plan catalog.

use std::sync::Arc;

use crate::domain::storefront::{Plan, PlanCatalog};

#[derive(Debug, Clone, Default)]
pub struct ListPlansQuery;

pub type ListPlansResult = Vec<Plan>;

pub struct ListPlansHandler {
    catalog: Arc<PlanCatalog>,
}

impl ListPlansHandler {
    pub fn new(catalog: Arc<PlanCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListPlansQuery) -> ListPlansResult {
        self.catalog.plans().to_vec()
    }
}
