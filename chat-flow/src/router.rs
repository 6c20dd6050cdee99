use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{FlowError, Result},
    task::Task,
};

/// Type alias for route condition functions
pub type RouteCondition<I> = Arc<dyn Fn(&I) -> bool + Send + Sync>;

/// A route from a condition to the task that handles matching input
pub struct Route<I, O> {
    pub task: Arc<dyn Task<I, O>>,
    pub condition: Option<RouteCondition<I>>,
}

impl<I, O> Route<I, O> {
    /// An unconditional route matches every input
    pub fn matches(&self, input: &I) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition(input))
    }
}

impl<I, O> Clone for Route<I, O> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
            condition: self.condition.clone(),
        }
    }
}

/// Output of a dispatch together with the id of the task that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Routed<O> {
    pub task_id: String,
    pub output: O,
}

/// An ordered list of routes evaluated first-match-wins.
///
/// A built router always ends in an unconditional route, so [`Router::dispatch`]
/// is total.
pub struct Router<I, O> {
    pub id: String,
    routes: Vec<Route<I, O>>,
}

impl<I, O> Router<I, O> {
    /// Find the first route whose condition holds for the input
    pub fn find_route(&self, input: &I) -> Option<&Route<I, O>> {
        self.routes.iter().find(|route| route.matches(input))
    }

    /// Run the first matching task
    pub fn dispatch(&self, input: &I) -> Routed<O> {
        // `build` guarantees an unconditional tail route
        let route = self
            .find_route(input)
            .unwrap_or_else(|| &self.routes[self.routes.len() - 1]);
        let task_id = route.task.id().to_string();
        debug!(router = %self.id, task_id = %task_id, "Dispatching input");

        Routed {
            output: route.task.run(input),
            task_id,
        }
    }

    /// Task ids in evaluation order
    pub fn task_ids(&self) -> Vec<&str> {
        self.routes.iter().map(|route| route.task.id()).collect()
    }
}

/// Builder for creating routers
pub struct RouterBuilder<I, O> {
    id: String,
    routes: Vec<Route<I, O>>,
}

impl<I, O> RouterBuilder<I, O> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            routes: Vec::new(),
        }
    }

    /// Add a route taken when `condition` holds. Routes are tried in insertion order.
    pub fn add_conditional_route<F>(mut self, task: Arc<dyn Task<I, O>>, condition: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            task,
            condition: Some(Arc::new(condition)),
        });
        self
    }

    /// Add a route that always matches
    pub fn add_route(mut self, task: Arc<dyn Task<I, O>>) -> Self {
        self.routes.push(Route {
            task,
            condition: None,
        });
        self
    }

    pub fn build(self) -> Result<Router<I, O>> {
        for (index, route) in self.routes.iter().enumerate() {
            let id = route.task.id();
            if self.routes[..index].iter().any(|r| r.task.id() == id) {
                return Err(FlowError::DuplicateRoute(id.to_string()));
            }
        }

        match self.routes.last() {
            Some(route) if route.condition.is_none() => Ok(Router {
                id: self.id,
                routes: self.routes,
            }),
            _ => Err(FlowError::MissingFallback(self.id)),
        }
    }
}
