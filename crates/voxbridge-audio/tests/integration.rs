use tokio::sync::mpsc;
use voxbridge_audio::{DeviceManager, FrameAssembler, FRAME_QUEUE_DEPTH};
use voxbridge_core::AudioFrame;

#[test]
#[ignore] // Requires audio hardware
fn test_device_enumeration() {
    let manager = DeviceManager::new();
    let inputs = manager.list_input_devices().unwrap();
    println!("Input devices: {}", inputs.len());
    for (name, _) in &inputs {
        println!("  - {}", name);
    }
}

#[tokio::test]
async fn test_assembled_frames_flow_through_queue_in_order() {
    let (tx, mut rx) = mpsc::channel::<AudioFrame>(FRAME_QUEUE_DEPTH);
    let mut assembler = FrameAssembler::new(4, 16000);

    // Two callbacks worth of samples, odd lengths on purpose.
    for frame in assembler.push(&[0, 1, 2, 3, 4, 5]) {
        tx.try_send(frame).unwrap();
    }
    for frame in assembler.push(&[6, 7, 8, 9]) {
        tx.try_send(frame).unwrap();
    }
    drop(tx);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.samples, vec![0, 1, 2, 3]);
    assert_eq!(second.samples, vec![4, 5, 6, 7]);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_overflow_drops_newest_and_keeps_queue_consistent() {
    let (tx, mut rx) = mpsc::channel::<AudioFrame>(2);
    let mut assembler = FrameAssembler::new(2, 16000);

    let mut dropped = 0u64;
    for frame in assembler.push(&[1, 1, 2, 2, 3, 3]) {
        if tx.try_send(frame).is_err() {
            dropped += 1;
        }
    }
    assert_eq!(dropped, 1);

    // The session still drains the two frames that made it in, in order.
    assert_eq!(rx.recv().await.unwrap().samples, vec![1, 1]);
    assert_eq!(rx.recv().await.unwrap().samples, vec![2, 2]);
}

#[test]
fn test_frame_sizes_from_historical_variants() {
    // 2000, 4000 and 8192 samples per frame all have to assemble cleanly.
    for frame_size in [2000usize, 4000, 8192] {
        let mut assembler = FrameAssembler::new(frame_size, 16000);
        let frames = assembler.push(&vec![0i16; frame_size * 2 + 17]);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.samples.len() == frame_size));
        assert_eq!(assembler.pending(), 17);
    }
}
