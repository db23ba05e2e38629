//! Whole-stack test: CoNLL-U text in, inflected phrases out.

use trellis::{ConlluReader, InflectEngine, Lang, PhrasePipeline, PipelineKind};

const CONLLU: &str = "\
# sent_id = demo-001
# text = Spam filters of web servers work.
1\tSpam\tspam\tNOUN\tNN\tNumber=Sing\t2\tcompound\t_\t_
2\tfilters\tfilter\tNOUN\tNNS\tNumber=Plur\t6\tnsubj\t_\t_
3\tof\tof\tADP\tIN\t_\t5\tcase\t_\t_
4\tweb\tweb\tNOUN\tNN\tNumber=Sing\t5\tcompound\t_\t_
5\tservers\tserver\tNOUN\tNNS\tNumber=Plur\t2\tnmod\t_\t_
6\twork\twork\tVERB\tVBP\tMood=Ind|Tense=Pres\t0\troot\t_\t_
7\t.\t.\tPUNCT\t.\t_\t6\tpunct\t_\t_
";

#[test]
fn conllu_to_inflected_phrases() {
    let mut doc = ConlluReader::new()
        .parse_str(CONLLU, Some(Lang::En))
        .unwrap();

    let pipeline = PhrasePipeline::new(PipelineKind::NounPhrases, 4).unwrap()
        .with_inflector(InflectEngine::with_bundled_resources().unwrap());
    pipeline.annotate_document(&mut doc).unwrap();

    let mut reprs: Vec<String> = doc[0].phrases().iter().map(|p| p.get_str_repr()).collect();
    reprs.sort();
    assert_eq!(
        reprs,
        [
            "spam filters",
            "spam filters of web servers",
            "web servers",
        ]
    );

    // ids are stable across a rebuild of the same text
    let mut doc2 = ConlluReader::new()
        .parse_str(CONLLU, Some(Lang::En))
        .unwrap();
    pipeline.annotate_document(&mut doc2).unwrap();
    let ids: Vec<u64> = doc[0].phrases().iter().map(|p| p.get_id()).collect();
    let ids2: Vec<u64> = doc2[0].phrases().iter().map(|p| p.get_id()).collect();
    assert_eq!(ids, ids2);
}
