use std::sync::Arc;

use dtra_diameter_dict::DictionaryManager;

use crate::settings::TranslatorSettings;

/// Stateless Diameter <-> RADIUS mapper.
///
/// Decoding lives in `decode`, the forward path in `forward` and answer
/// building in `answer`.
#[derive(Debug, Clone)]
pub struct MessageTranslator {
    pub(crate) settings: Arc<TranslatorSettings>,
    pub(crate) dictionary: Arc<DictionaryManager>,
}

impl MessageTranslator {
    pub fn new(settings: TranslatorSettings, dictionary: Arc<DictionaryManager>) -> Self {
        Self {
            settings: Arc::new(settings),
            dictionary,
        }
    }

    pub fn settings(&self) -> &TranslatorSettings {
        &self.settings
    }

    pub fn dictionary(&self) -> &DictionaryManager {
        &self.dictionary
    }
}
