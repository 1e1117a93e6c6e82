//! Connector seam and command-runner convenience wrapper.
//!
//! The network layer is an external collaborator: this core only needs
//! "submit one command string, get back an ordered sequence of result
//! blocks". Engine-reported failures stay in the connector's own error
//! type and are never reinterpreted here.

use tracing::debug;

use crate::block::DataVariableBlock;
use crate::schema::{Creatable, Droppable, Loadable};

/// Narrow interface to whatever transports commands to the engine.
///
/// One call is one command: no streaming, retries, or partial results are
/// required of implementations. Cancellation and timeouts are entirely the
/// connector's business.
pub trait Connector {
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(&mut self, query: &str) -> Result<Vec<DataVariableBlock>, Self::Error>;
}

/// Builds command text from schema objects and forwards it to a connector.
#[derive(Debug)]
pub struct CommandRunner<C: Connector> {
    connector: C,
}

impl<C: Connector> CommandRunner<C> {
    pub fn new(connector: C) -> Self {
        CommandRunner { connector }
    }

    pub fn into_inner(self) -> C {
        self.connector
    }

    pub fn execute(&mut self, query: &str) -> Result<Vec<DataVariableBlock>, C::Error> {
        debug!(%query, "submitting command");
        self.connector.execute(query)
    }

    pub fn create(&mut self, element: &impl Creatable) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&element.create_command())
    }

    pub fn load(&mut self, element: &impl Loadable) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&element.load_command())
    }

    pub fn drop(&mut self, element: &impl Droppable) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&element.drop_command())
    }

    pub fn drop_tar(&mut self, name: &str) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&format!("DROP_TAR(\"{name}\");"))
    }

    pub fn drop_dataset(&mut self, name: &str) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&format!("DROP_DATASET(\"{name}\");"))
    }

    pub fn drop_type(&mut self, name: &str) -> Result<Vec<DataVariableBlock>, C::Error> {
        self.execute(&format!("DROP_TYPE(\"{name}\");"))
    }
}
