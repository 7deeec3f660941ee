use std::hint::black_box;

use vringbuf::VirtualRingBuf;

fn main() {
    divan::main();
}

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

const BUFFER_SIZE: usize = 1024 * 1024;

#[divan::bench(args = [8, 64, 1024, 16 * 1024])]
fn bench_reserve_commit_take_decommit(bencher: divan::Bencher, record_size: usize) {
    let record = vec![0xABu8; record_size];
    let mut ringbuf = VirtualRingBuf::new(BUFFER_SIZE).unwrap();

    bencher.bench_local(move || {
        for _ in 0..1000 {
            ringbuf.reserve()[..record_size].copy_from_slice(&record);
            ringbuf.commit(record_size);

            black_box(&ringbuf.take()[..record_size]);
            ringbuf.decommit(record_size);
        }
    });
}

#[divan::bench(args = [64, 4096])]
fn bench_fill_and_drain(bencher: divan::Bencher, chunk: usize) {
    let input = vec![0x5Au8; 64 * 1024];
    let mut output = Vec::with_capacity(input.len());
    let mut ringbuf = VirtualRingBuf::new(BUFFER_SIZE).unwrap();

    bencher.bench_local(move || {
        let mut source: &[u8] = &input;
        output.clear();
        while ringbuf.fill_from(&mut source, chunk).unwrap() > 0 {
            while !ringbuf.is_empty() {
                ringbuf.drain_to(&mut output, chunk).unwrap();
            }
        }
        black_box(output.len());
    });
}

#[divan::bench]
fn bench_create(bencher: divan::Bencher) {
    bencher.bench(|| VirtualRingBuf::new(black_box(BUFFER_SIZE)).unwrap());
}
