//! Loading of go-diameter style XML dictionary files.
//!
//! Only AVP definitions are read; `<command>` and `<vendor>` elements are
//! accepted and ignored.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::data_type::{AvpDataType, ParseError};
use crate::manager::{AvpInfo, DictionaryManager};

#[derive(Debug, Deserialize)]
struct XmlDiameter {
    #[serde(rename = "application", default)]
    applications: Vec<XmlApplication>,
}

#[derive(Debug, Deserialize)]
struct XmlApplication {
    #[serde(rename = "@id")]
    id: u32,
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "avp", default)]
    avps: Vec<XmlAvp>,
}

#[derive(Debug, Deserialize)]
struct XmlAvp {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@code")]
    code: u32,
    #[serde(rename = "@must", default)]
    must: String,
    #[serde(rename = "@vendor-id", default)]
    vendor_id: Option<u32>,
    data: XmlData,
}

#[derive(Debug, Deserialize)]
struct XmlData {
    #[serde(rename = "@type")]
    data_type: String,
}

impl XmlAvp {
    fn into_info(self) -> Result<AvpInfo, ParseError> {
        Ok(AvpInfo {
            code: self.code,
            data_type: AvpDataType::from_xml_name(&self.data.data_type)?,
            vendor_id: self.vendor_id.filter(|v| *v != 0),
            mandatory: self.must.split(',').any(|flag| flag.trim() == "M"),
            name: self.name,
        })
    }
}

impl DictionaryManager {
    /// Merge AVP definitions from an XML document. Returns how many were loaded.
    pub fn load_xml_str(&mut self, xml: &str) -> Result<usize, ParseError> {
        let doc: XmlDiameter =
            quick_xml::de::from_str(xml).map_err(|e| ParseError::Xml(e.to_string()))?;

        let mut loaded = 0;
        for app in doc.applications {
            debug!(
                application_id = app.id,
                name = app.name.as_deref().unwrap_or(""),
                avps = app.avps.len(),
                "Loading dictionary application"
            );
            for avp in app.avps {
                self.insert(avp.into_info()?);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Merge AVP definitions from an XML file
    pub fn load_xml_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ParseError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path)?;
        let loaded = self.load_xml_str(&xml)?;
        info!(path = %path.display(), avps = loaded, "Loaded dictionary file");
        Ok(loaded)
    }

    /// Built-in dictionary extended with every file in `paths`, in order
    pub fn with_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ParseError> {
        let mut dict = Self::new();
        for path in paths {
            dict.load_xml_file(path)?;
        }
        Ok(dict)
    }
}
