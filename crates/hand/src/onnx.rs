use {
    crate::{
        HandError, HandTracker, LandmarkSet, TrackerConfig,
        roi::{Roi, TRACKING_SCALE},
    },
    base::log,
    image::Frame,
    ndarray::Array4,
    ort::{inputs, session::Session, value::TensorRef},
    std::path::Path,
};

/// Default square input side of hand landmark models.
pub const INPUT_SIZE: usize = 224;

/// Single-stage hand landmark tracker over an ONNX model.
///
/// The model takes a `[1, N, N, 3]` RGB tensor in [0, 1] and produces 63
/// landmark values in input-pixel coordinates, followed optionally by a
/// hand presence score. Without a previous hand the whole frame is searched
/// and the score must reach `min_detection_confidence`. Once a hand is seen,
/// the next frame is cropped around it and `min_tracking_confidence`
/// applies. This tracker reports at most one hand per frame.
pub struct OnnxHandTracker {
    session: Option<Session>,
    config: TrackerConfig,
    input_name: String,
    landmarks_output: String,
    presence_output: Option<String>,
    input_size: usize,
    previous: Option<LandmarkSet>,
}

impl OnnxHandTracker {
    pub fn open(model: impl AsRef<Path>, config: TrackerConfig) -> Result<Self, HandError> {
        let model = model.as_ref();
        let session = Session::builder()
            .map_err(|e| HandError::Model(format!("failed to create session builder: {}", e)))?
            .commit_from_file(model)
            .map_err(|e| {
                HandError::Model(format!("failed to load {}: {}", model.display(), e))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| HandError::Model("model has no inputs".to_string()))?;
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        let Some(landmarks_output) = output_names.first().cloned() else {
            return Err(HandError::Model("model has no outputs".to_string()));
        };
        let presence_output = output_names.get(1).cloned();

        log::info!(
            "hand tracker: loaded {} (input {}, outputs {:?})",
            model.display(),
            input_name,
            output_names
        );

        Ok(Self {
            session: Some(session),
            config,
            input_name,
            landmarks_output,
            presence_output,
            input_size: INPUT_SIZE,
            previous: None,
        })
    }

    /// Override the model's square input side.
    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl HandTracker for OnnxHandTracker {
    fn infer(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, HandError> {
        if self.config.max_hands() == 0 {
            return Ok(Vec::new());
        }
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| HandError::Model("session is closed".to_string()))?;

        let (roi, threshold) = match &self.previous {
            Some(set) => (
                Roi::around(set, frame.size(), TRACKING_SCALE),
                self.config.min_tracking_confidence(),
            ),
            None => (
                Roi::full(frame.size()),
                self.config.min_detection_confidence(),
            ),
        };

        let n = self.input_size;
        let array = Array4::from_shape_vec((1, n, n, 3), roi.sample(frame, n))
            .map_err(|e| HandError::Inference(format!("failed to build input: {}", e)))?;
        let tensor = TensorRef::from_array_view(array.view())?;
        let outputs = session.run(inputs![self.input_name.as_str() => tensor])?;

        let raw: Vec<f32> = outputs[self.landmarks_output.as_str()]
            .try_extract_array::<f32>()?
            .iter()
            .copied()
            .collect();
        let presence = match &self.presence_output {
            Some(name) => {
                let score = outputs[name.as_str()]
                    .try_extract_array::<f32>()?
                    .iter()
                    .next()
                    .copied()
                    .unwrap_or(0.0);
                // some exports emit a logit instead of a probability
                if (0.0..=1.0).contains(&score) {
                    score
                } else {
                    sigmoid(score)
                }
            }
            None => 1.0,
        };

        if presence < threshold {
            self.previous = None;
            return Ok(Vec::new());
        }
        let set = roi.to_frame(&raw, n, frame.size())?;
        self.previous = Some(set);
        Ok(vec![set])
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            log::info!("hand tracker: session released");
        }
        self.previous = None;
    }
}
