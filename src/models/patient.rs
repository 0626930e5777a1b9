use base64::Engine as _;
use serde::Serialize;

use super::ModelError;

/// Oldest accepted patient age.
pub const MAX_AGE: u16 = 150;

/// Narrative used when the patient supplied no symptom text at all.
pub const PLACEHOLDER_SYMPTOMS: &str =
    "The user describes general flu-like symptoms with no further detail.";

/// Label that introduces a speech transcript inside the narrative.
pub const TRANSCRIPT_LABEL: &str = "Voice transcript:";

/// Patient facts for a single diagnostic request.
///
/// Fields are private so the context cannot change once the pipeline has
/// started; the only derivation is [`PatientContext::with_transcript`], which
/// consumes the value and returns a new one.
#[derive(Debug, Clone, Serialize)]
pub struct PatientContext {
    age: u16,
    gender: String,
    symptoms: String,
    voice_transcript: Option<String>,
    #[serde(skip)]
    image: Option<ImagePayload>,
}

impl PatientContext {
    /// Gender is free-form and not checked against any list.
    pub fn new(age: u16, gender: &str, symptoms: &str) -> Result<Self, ModelError> {
        if age > MAX_AGE {
            return Err(ModelError::AgeOutOfRange(age));
        }
        Ok(Self {
            age,
            gender: gender.to_string(),
            symptoms: symptoms.to_string(),
            voice_transcript: None,
            image: None,
        })
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.voice_transcript = Some(transcript.to_string());
        self
    }

    pub fn age(&self) -> u16 {
        self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Symptom text exactly as the caller supplied it.
    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn voice_transcript(&self) -> Option<&str> {
        self.voice_transcript.as_deref()
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    /// Full accumulated narrative: symptom text, then the labelled transcript.
    /// Empty input becomes [`PLACEHOLDER_SYMPTOMS`].
    pub fn narrative(&self) -> String {
        let mut text = self.symptoms.clone();
        if let Some(transcript) = &self.voice_transcript {
            text.push('\n');
            text.push_str(TRANSCRIPT_LABEL);
            text.push(' ');
            text.push_str(transcript);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            PLACEHOLDER_SYMPTOMS.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Image attached to a diagnostic request, held base64-encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Accepts plain base64 or a `data:<mime>;base64,` URL.
    pub fn from_base64(encoded: &str) -> Result<Self, ModelError> {
        let body = strip_data_url(encoded.trim());
        base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| ModelError::InvalidPayload(format!("image is not valid base64: {e}")))?;
        Ok(Self {
            base64: body.to_string(),
        })
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }
}

/// Recorded speech to be transcribed before diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
    file_name: String,
    mime_type: String,
}

impl AudioPayload {
    /// Mobile recorders default to AAC in an MP4 container.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "audio.m4a".to_string(),
            mime_type: "audio/mp4".to_string(),
        }
    }

    pub fn from_base64(encoded: &str) -> Result<Self, ModelError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(strip_data_url(encoded.trim()))
            .map_err(|e| ModelError::InvalidPayload(format!("audio is not valid base64: {e}")))?;
        Ok(Self::new(bytes))
    }

    pub fn with_format(mut self, file_name: &str, mime_type: &str) -> Self {
        self.file_name = file_name.to_string();
        self.mime_type = mime_type.to_string();
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn strip_data_url(encoded: &str) -> &str {
    match encoded.split_once(";base64,") {
        Some((prefix, body)) if prefix.starts_with("data:") => body,
        _ => encoded,
    }
}
