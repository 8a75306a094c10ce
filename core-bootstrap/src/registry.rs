//! In-process capability registry.
//!
//! A module implemented in Rust (or a test) publishes its entry points here
//! one at a time. The registry only reports readiness once all three are
//! present, matching the all-or-nothing contract of [`CapabilityRegistry`].

use bridge_traits::{
    CapabilityRegistry, CapabilitySet, FieldExtractor, JsonProcessor, RequestExecutor,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

#[derive(Default)]
pub struct LocalRegistry {
    json: RefCell<Option<Rc<dyn JsonProcessor>>>,
    fields: RefCell<Option<Rc<dyn FieldExtractor>>>,
    request: RefCell<Option<Rc<dyn RequestExecutor>>>,
}

impl LocalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_json_processor(&self, processor: Rc<dyn JsonProcessor>) {
        trace!("JSON processor published");
        *self.json.borrow_mut() = Some(processor);
    }

    pub fn publish_field_extractor(&self, extractor: Rc<dyn FieldExtractor>) {
        trace!("Field extractor published");
        *self.fields.borrow_mut() = Some(extractor);
    }

    pub fn publish_request_executor(&self, executor: Rc<dyn RequestExecutor>) {
        trace!("Request executor published");
        *self.request.borrow_mut() = Some(executor);
    }

    pub fn publish_all(&self, set: CapabilitySet) {
        self.publish_json_processor(set.json);
        self.publish_field_extractor(set.fields);
        self.publish_request_executor(set.request);
    }
}

impl CapabilityRegistry for LocalRegistry {
    fn capabilities(&self) -> Option<CapabilitySet> {
        Some(CapabilitySet::new(
            self.json.borrow().clone()?,
            self.fields.borrow().clone()?,
            self.request.borrow().clone()?,
        ))
    }
}
