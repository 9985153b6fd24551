use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use venue_matcher::application::services::{EngineConfig, MatchingEngine};
use venue_matcher::domain::entities::{Asset, Order, OrderType, Price};
use venue_matcher::shared::AssetPool;

// --- 配置 ---
const NUM_PRODUCERS: u64 = 4; // 并发下单线程数量
const TEST_DURATION: Duration = Duration::from_secs(10);
const ASSETS: [&str; 4] = ["PETR4", "VALE3", "ITUB4", "BBDC4"];

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("启动吞吐量测试...");
    println!("下单线程数量: {}", NUM_PRODUCERS);
    println!("测试持续时间: {:?}", TEST_DURATION);

    let mut engine = match MatchingEngine::start_untracked(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("无法启动撮合引擎: {}", e);
            std::process::exit(1);
        }
    };

    let pool = Arc::new(AssetPool::new());
    pool.preload(&ASSETS);

    let submitted = Arc::new(AtomicU64::new(0));
    let deadline = Instant::now() + TEST_DURATION;

    let producers: Vec<_> = (0..NUM_PRODUCERS)
        .map(|producer_id| {
            let inbound = engine.sender();
            let pool = pool.clone();
            let submitted = submitted.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut order_id = producer_id << 48;
                while Instant::now() < deadline {
                    order_id += 1;
                    let order_type = if rng.gen::<bool>() { OrderType::Buy } else { OrderType::Sell };
                    let price = match order_type {
                        OrderType::Buy => rng.gen_range(4990..=5000),
                        OrderType::Sell => rng.gen_range(5000..=5010),
                    };
                    let asset = Asset::new(pool.intern(ASSETS[rng.gen_range(0..ASSETS.len())]));
                    let order = Order::new(
                        order_id,
                        producer_id,
                        asset,
                        order_type,
                        Price::new(price),
                        rng.gen_range(1..=500),
                    );
                    if inbound.send(order).is_err() {
                        break;
                    }
                    submitted.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let Some(mut processed) = engine.take_processed() else {
        eprintln!("输出通道不可用");
        std::process::exit(1);
    };
    let consumer = thread::spawn(move || {
        let mut count = 0u64;
        while processed.blocking_recv().is_some() {
            count += 1;
        }
        count
    });

    for producer in producers {
        let _ = producer.join();
    }

    let started = Instant::now();
    let book = match engine.shutdown() {
        Ok(book) => book,
        Err(e) => {
            eprintln!("撮合引擎异常退出: {}", e);
            std::process::exit(1);
        }
    };
    let drain_time = started.elapsed();
    let processed_orders = consumer.join().unwrap_or_default();

    let total_orders = submitted.load(Ordering::Relaxed);
    let total_transactions = book.transactions().len();

    println!("\n--- 测试结果 ---");
    println!("提交订单数: {}", total_orders);
    println!("成交笔数: {}", total_transactions);
    println!("已处理订单回报: {}", processed_orders);
    println!("剩余挂单: {}", book.resting_orders().count());
    println!("订单吞吐量 (orders/s): {:.2}", total_orders as f64 / TEST_DURATION.as_secs_f64());
    println!("关闭时排空耗时: {:?}", drain_time);
}
