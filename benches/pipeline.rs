//! Baseline throughput of the extraction pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use trellis::{PhrasePipeline, PipelineKind, PosTag, Sentence, SyntLink, Word};

fn mkw(lemma: &str, offs: i32, pos: PosTag, link: SyntLink) -> Word {
    Word::tagged(lemma, pos, offs, link)
}

fn sample_sentence() -> Sentence {
    Sentence::new(vec![
        mkw("long", 1, PosTag::Adj, SyntLink::Compound),
        mkw("standing", 2, PosTag::Adj, SyntLink::Amod),
        mkw("spam", 1, PosTag::Noun, SyntLink::Compound),
        mkw("filter", 0, PosTag::Noun, SyntLink::Root),
        mkw("of", 2, PosTag::Adp, SyntLink::Case),
        mkw("web", 1, PosTag::Noun, SyntLink::Compound),
        mkw("server", -3, PosTag::Noun, SyntLink::Nmod),
    ])
}

fn wide_sentence(mods: usize) -> Sentence {
    let mut words: Vec<Word> = (0..mods)
        .map(|i| mkw(&format!("m{i}"), (mods - i) as i32, PosTag::Adj, SyntLink::Amod))
        .collect();
    words.push(mkw("head", 0, PosTag::Noun, SyntLink::Root));
    Sentence::new(words)
}

fn bench_extraction(c: &mut Criterion) {
    let pipeline = PhrasePipeline::new(PipelineKind::NounPhrases, 4).unwrap();

    c.bench_function("extract_mwe_sentence", |b| {
        b.iter(|| {
            let mut sent = sample_sentence();
            black_box(pipeline.extract(&mut sent).unwrap())
        })
    });

    c.bench_function("extract_wide_head", |b| {
        b.iter(|| {
            let mut sent = wide_sentence(6);
            black_box(pipeline.extract(&mut sent).unwrap())
        })
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
