use criterion::{self, criterion_group, criterion_main, BenchmarkId};

use kvmap::{
    json_over_text, AsyncDataProvider, Document, JsonStringCodec, MemoryDataProvider, ProviderExt,
    StringDocumentCodec, ValueCodec,
};
use serde_json::Value;
use tokio::runtime::Runtime;

fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.insert("name".to_owned(), Value::String("Ann".to_owned()));
    doc.insert("city".to_owned(), Value::String("Berlin".to_owned()));
    doc.insert("visits".to_owned(), Value::from(42));
    doc
}

fn encode_decode(c: &mut criterion::Criterion) {
    let json = JsonStringCodec;
    let document = sample_document();
    c.bench_function("json_string_encode", |b| {
        b.iter(|| json.encode("key", document.clone()))
    });

    let encoded = json.encode("key", document.clone());
    c.bench_function("json_string_decode", |b| {
        b.iter(|| json.decode(encoded.clone()).unwrap())
    });

    let wrap = StringDocumentCodec;
    c.bench_function("scalar_wrap_encode", |b| {
        b.iter(|| wrap.encode("key", "a moderately sized payload".to_owned()))
    });
}

fn mapped_read(c: &mut criterion::Criterion) {
    let rt = Runtime::new().unwrap();
    let store = rt.block_on(async {
        let store = json_over_text(MemoryDataProvider::<String>::new());
        store.put("key".to_owned(), sample_document());
        store.flush().await;
        store
    });

    c.bench_with_input(BenchmarkId::new("read", "mapped"), &store, |b, s| {
        b.to_async(&rt).iter(|| async {
            s.get_value("key").await.unwrap().unwrap();
        })
    });
}

criterion_group!(benches, encode_decode, mapped_read);
criterion_main!(benches);
