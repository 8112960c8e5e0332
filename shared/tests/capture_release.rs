//! Every acquired camera stream is stopped exactly once, whatever path the
//! player takes through the capture panel.

use std::cell::Cell;
use std::rc::Rc;

use spyboard_shared::capture::{CaptureFlow, MissionCapture, StreamRequest, VideoStream};
use spyboard_shared::config::CaptureConfig;
use spyboard_shared::{CapturedImage, Detector, DeviceError, Scene};

/// Fake media device counting acquisitions and stops.
#[derive(Default)]
struct Device {
    acquired: Cell<usize>,
    stopped: Cell<usize>,
}

impl Device {
    fn open(self: &Rc<Self>) -> FakeStream {
        self.acquired.set(self.acquired.get() + 1);
        FakeStream {
            device: self.clone(),
        }
    }

    fn balanced(&self) -> bool {
        self.acquired.get() == self.stopped.get()
    }
}

struct FakeStream {
    device: Rc<Device>,
}

impl VideoStream for FakeStream {
    fn stop(&mut self) {
        self.device.stopped.set(self.device.stopped.get() + 1);
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn snapshot(&mut self, _max_size: [u32; 2], _quality: f64) -> Option<CapturedImage> {
        CapturedImage::new("data:image/jpeg;base64,", [1, 1], vec![0, 0, 0, 255])
    }
}

struct NoLabels;

impl Detector for NoLabels {
    fn detect(&mut self, _image: &CapturedImage, _scene: &Scene) -> Vec<String> {
        Vec::new()
    }
}

fn agent_flow() -> CaptureFlow<FakeStream> {
    let cfg = CaptureConfig::default();
    CaptureFlow::new(cfg.agent, cfg.jpeg_quality)
}

fn answer(flow: &mut CaptureFlow<FakeStream>, req: StreamRequest, device: &Rc<Device>) {
    flow.stream_ready(req.ticket, Ok(device.open()));
}

#[test]
fn cancel_while_previewing() {
    let device = Rc::new(Device::default());
    let mut flow = agent_flow();
    let req = flow.request().unwrap();
    answer(&mut flow, req, &device);
    flow.cancel();
    assert_eq!(device.acquired.get(), 1);
    assert!(device.balanced());
}

#[test]
fn confirm_after_capture() {
    let device = Rc::new(Device::default());
    let mut flow = agent_flow();
    let req = flow.request().unwrap();
    answer(&mut flow, req, &device);
    assert!(flow.capture());
    assert!(flow.confirm().is_some());
    drop(flow);
    assert_eq!(device.stopped.get(), 1);
    assert!(device.balanced());
}

#[test]
fn teardown_while_previewing() {
    let device = Rc::new(Device::default());
    {
        let mut flow = agent_flow();
        let req = flow.request().unwrap();
        answer(&mut flow, req, &device);
    }
    assert!(device.balanced());
}

#[test]
fn repeated_retakes() {
    let device = Rc::new(Device::default());
    let mut flow = agent_flow();
    let mut req = flow.request().unwrap();
    for _ in 0..4 {
        answer(&mut flow, req, &device);
        assert!(flow.capture());
        req = flow.retake().unwrap();
    }
    answer(&mut flow, req, &device);
    drop(flow);
    assert_eq!(device.acquired.get(), 5);
    assert!(device.balanced());
}

#[test]
fn late_stream_after_teardown_path() {
    let device = Rc::new(Device::default());
    let mut flow = agent_flow();
    let first = flow.request().unwrap();
    flow.stream_ready(first.ticket, Err(DeviceError::DeviceBusy));
    let second = flow.request().unwrap();
    // the first request resolves late with a stream after all
    answer(&mut flow, first, &device);
    assert_eq!(device.stopped.get(), 1);
    answer(&mut flow, second, &device);
    flow.cancel();
    assert_eq!(device.acquired.get(), 2);
    assert!(device.balanced());
}

#[test]
fn mission_capture_paths() {
    let device = Rc::new(Device::default());
    let cfg = CaptureConfig::default();
    let mut mission = MissionCapture::new(
        Scene::new("counting stolen money"),
        cfg.mission,
        cfg.jpeg_quality,
        1.5,
    );
    let req = mission.flow_mut().request().unwrap();
    answer(mission.flow_mut(), req, &device);
    assert!(mission.flow_mut().capture());
    assert!(mission.analyze(0.0));
    assert!(mission.poll(2.0, &mut NoLabels));
    let req = mission.retake().unwrap();
    answer(mission.flow_mut(), req, &device);
    assert!(mission.flow_mut().capture());
    mission.analyze(3.0);
    mission.poll(4.5, &mut NoLabels);
    let (_, detection) = mission.confirm().unwrap();
    assert_eq!(detection.points, 0);
    drop(mission);
    assert_eq!(device.acquired.get(), 2);
    assert!(device.balanced());
}
