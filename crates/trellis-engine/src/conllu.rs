//! CoNLL-U ingestion
//!
//! Decodes Universal Dependencies v2 data into the core word model. Columns
//! used: FORM(1), LEMMA(2), UPOS(3), FEATS(5), HEAD(6), DEPREL(7), DEPS(8).
//! When the enhanced DEPS column offers an alternative head bearing a
//! phrase-favoring relation (or CONJ), it overrides HEAD/DEPREL for that
//! token — the phrase builders prefer the reading they can use.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

use trellis_core::features::{
    Animacy, Aspect, Case, Degree, Gender, Mood, NumType, Number, Person, Tense, Voice,
};
use trellis_core::tags::{Lang, PosTag, SyntLink};
use trellis_core::{Document, Sentence, Word};

use crate::{EngineError, EngineResult};

/// Relations that make a token usable by the phrase builders; an enhanced
/// dependency carrying one of these (or CONJ) wins over the basic head.
const PHRASE_FAVORED_RELS: [SyntLink; 6] = [
    SyntLink::Amod,
    SyntLink::Nmod,
    SyntLink::Compound,
    SyntLink::Fixed,
    SyntLink::Flat,
    SyntLink::Nummod,
];

/// Configuration for CoNLL-U ingestion.
#[derive(Debug, Clone)]
pub struct ConlluReaderConfig {
    /// Skip multi-word token ranges ("4-5").
    pub skip_multiword_tokens: bool,
    /// Skip empty nodes ("5.1").
    pub skip_empty_nodes: bool,
    /// Stop after this many sentences.
    pub max_sentences: Option<usize>,
}

impl Default for ConlluReaderConfig {
    fn default() -> Self {
        ConlluReaderConfig {
            skip_multiword_tokens: true,
            skip_empty_nodes: true,
            max_sentences: None,
        }
    }
}

/// Reader decoding CoNLL-U text into a [`Document`].
pub struct ConlluReader {
    config: ConlluReaderConfig,
}

impl ConlluReader {
    pub fn new() -> Self {
        ConlluReader {
            config: ConlluReaderConfig::default(),
        }
    }

    pub fn with_config(config: ConlluReaderConfig) -> Self {
        ConlluReader { config }
    }

    /// Parse CoNLL-U text into a document tagged with `lang`.
    pub fn parse_str(&self, conllu: &str, lang: Option<Lang>) -> EngineResult<Document> {
        let mut doc = Document::new(lang);

        let mut comment_text: Option<String> = None;
        let mut sent = Sentence::default();

        for line in conllu.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.finish_sentence(&mut doc, &mut sent, comment_text.take());
                if let Some(max) = self.config.max_sentences {
                    if doc.len() >= max {
                        return Ok(doc);
                    }
                }
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some((key, value)) = comment.split_once('=') {
                    if key.trim() == "text" {
                        comment_text = Some(value.trim().to_string());
                    }
                }
                continue;
            }
            if let Some(word) = self.parse_token_line(line, sent.len())? {
                sent.add_word(word);
            }
        }
        self.finish_sentence(&mut doc, &mut sent, comment_text.take());

        Ok(doc)
    }

    /// Parse a CoNLL-U file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P, lang: Option<Lang>) -> EngineResult<Document> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EngineError::io(format!("open {}", path.display()), e))?;
        let mut reader = BufReader::new(file);
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|e| EngineError::io(format!("read {}", path.display()), e))?;
        self.parse_str(&contents, lang)
    }

    /// Parse from any buffered reader.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R, lang: Option<Lang>) -> EngineResult<Document> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|e| EngineError::io("read conllu stream", e))?;
        self.parse_str(&contents, lang)
    }

    fn finish_sentence(&self, doc: &mut Document, sent: &mut Sentence, text: Option<String>) {
        if sent.is_empty() {
            return;
        }
        let mut finished = std::mem::take(sent);
        if let Some(text) = text {
            assign_offsets(&mut finished, &text);
        }
        doc.add_sent(finished);
    }

    /// Decode one token line; None for skipped ranges/empty nodes.
    fn parse_token_line(&self, line: &str, word_pos: usize) -> EngineResult<Option<Word>> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 10 {
            return Err(EngineError::malformed(format!(
                "token line has {} fields, expected 10: {line}",
                fields.len()
            )));
        }

        let id = fields[0];
        if id.contains('-') {
            if self.config.skip_multiword_tokens {
                debug!(id, "skipping multi-word token range");
                return Ok(None);
            }
            return Err(EngineError::malformed(format!("unexpected token range: {id}")));
        }
        if id.contains('.') {
            if self.config.skip_empty_nodes {
                debug!(id, "skipping empty node");
                return Ok(None);
            }
            return Err(EngineError::malformed(format!("unexpected empty node: {id}")));
        }

        let mut word = Word::new(match fields[2] {
            "_" => String::new(),
            lemma => lemma.to_lowercase(),
        });
        word.form = Some(fields[1].to_string());
        word.len = fields[1].len();

        let feats = parse_feats(fields[5]);
        word.pos_tag = refine_pos_tag(PosTag::from_upos(fields[3]), &feats);
        assign_morph_features(&mut word, &feats);

        fill_syntax(&mut word, word_pos, fields[6], fields[7], fields[8])?;

        Ok(Some(word))
    }
}

impl Default for ConlluReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_feats(column: &str) -> Vec<(String, String)> {
    if column == "_" {
        return Vec::new();
    }
    column
        .split('|')
        .filter_map(|f| f.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn feat<'a>(feats: &'a [(String, String)], key: &str) -> Option<&'a str> {
    feats.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Apply the VerbForm/Variant refinements that split participles, gerunds
/// and short forms off the plain VERB/ADJ tags.
fn refine_pos_tag(pos: PosTag, feats: &[(String, String)]) -> PosTag {
    match pos {
        PosTag::Verb => match feat(feats, "VerbForm") {
            Some("Part") => {
                if feat(feats, "Variant") == Some("Short") {
                    PosTag::ParticipleShort
                } else {
                    PosTag::Participle
                }
            }
            Some("Ger") => PosTag::Gerund,
            Some("Conv") => PosTag::ParticipleAdverb,
            _ => pos,
        },
        PosTag::Adj if feat(feats, "Variant") == Some("Short") => PosTag::AdjShort,
        _ => pos,
    }
}

fn assign_morph_features(word: &mut Word, feats: &[(String, String)]) {
    word.number = feat(feats, "Number").and_then(Number::from_ud);
    word.gender = feat(feats, "Gender").and_then(Gender::from_ud);
    word.case = feat(feats, "Case").and_then(Case::from_ud);
    word.tense = feat(feats, "Tense").and_then(Tense::from_ud);
    word.person = feat(feats, "Person").and_then(Person::from_ud);
    word.degree = feat(feats, "Degree").and_then(Degree::from_ud);
    word.aspect = feat(feats, "Aspect").and_then(Aspect::from_ud);
    word.voice = feat(feats, "Voice").and_then(Voice::from_ud);
    word.num_type = feat(feats, "NumType").and_then(NumType::from_ud);
    word.animacy = feat(feats, "Animacy").and_then(Animacy::from_ud);
    if word.pos_tag == PosTag::Verb {
        word.mood = feat(feats, "Mood").and_then(Mood::from_ud);
    }
}

/// Pick head and relation, letting an enhanced dependency with a
/// phrase-favoring relation (or CONJ) override the basic annotation.
fn fill_syntax(
    word: &mut Word,
    word_pos: usize,
    head_col: &str,
    deprel_col: &str,
    deps_col: &str,
) -> EngineResult<()> {
    let mut head: Option<i64> = None;
    let mut rel: Option<SyntLink> = None;

    if deps_col != "_" && !deps_col.is_empty() {
        for var in deps_col.split('|') {
            let mut parts = var.splitn(2, ':');
            let (Some(head_str), Some(rel_str)) = (parts.next(), parts.next()) else {
                continue;
            };
            // empty-node references ("3.1:rel") are unusable here
            let Ok(var_head) = head_str.parse::<i64>() else {
                continue;
            };
            let Some(var_rel) = SyntLink::from_deprel(rel_str) else {
                continue;
            };
            if var_rel == SyntLink::Conj || PHRASE_FAVORED_RELS.contains(&var_rel) {
                head = Some(var_head);
                rel = Some(var_rel);
                break;
            }
            if head.is_none() {
                head = Some(var_head);
                rel = Some(var_rel);
            }
        }
    }

    if head.is_none() && head_col != "_" {
        head = Some(
            head_col
                .parse::<i64>()
                .map_err(|_| EngineError::malformed(format!("invalid HEAD column: {head_col}")))?,
        );
    }
    if rel.is_none() && deprel_col != "_" {
        rel = SyntLink::from_deprel(deprel_col);
        if rel.is_none() {
            debug!(deprel_col, "unknown dependency relation");
        }
    }

    if let (Some(head), Some(rel)) = (head, rel) {
        // CoNLL-U heads are 1-based; 0 means root
        let head = head - 1;
        word.parent_offs = if head == -1 { 0 } else { (head - word_pos as i64) as i32 };
        word.synt_link = Some(rel);
    }
    Ok(())
}

/// Locate each form in the sentence text and record byte offsets.
fn assign_offsets(sent: &mut Sentence, text: &str) {
    let mut cur = 0usize;
    for word in sent.words_mut() {
        let Some(form) = word.form.as_deref() else {
            continue;
        };
        match text[cur.min(text.len())..].find(form) {
            Some(rel) => {
                word.offset = cur + rel;
                word.len = form.len();
                cur = word.offset + word.len;
            }
            None => {
                warn!(form, "form not found in sentence text; offsets incomplete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SIMPLE: &str = "\
# sent_id = test-001
# text = Spam filters work.
1\tSpam\tspam\tNOUN\tNN\tNumber=Sing\t2\tcompound\t_\t_
2\tfilters\tfilter\tNOUN\tNNS\tNumber=Plur\t3\tnsubj\t_\t_
3\twork\twork\tVERB\tVBP\tMood=Ind|Tense=Pres\t0\troot\t_\t_
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_
";

    #[test]
    fn test_parse_simple_sentence() {
        let doc = ConlluReader::new().parse_str(SIMPLE, Some(Lang::En)).unwrap();
        assert_eq!(doc.len(), 1);

        let sent = &doc[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].lemma, "spam");
        assert_eq!(sent[0].parent_offs, 1);
        assert_eq!(sent[0].synt_link, Some(SyntLink::Compound));
        assert_eq!(sent[1].number, Some(Number::Plur));
        assert_eq!(sent[2].parent_offs, 0);
        assert_eq!(sent[2].mood, Some(Mood::Ind));

        // offsets recovered from the text comment
        assert_eq!(sent[0].offset, 0);
        assert_eq!(sent[1].offset, 5);
        assert_eq!(sent[2].offset, 13);
    }

    #[test]
    fn test_enhanced_deps_override() {
        // basic head says punct->4, enhanced offers nmod->1 which we prefer
        let data = "\
1\troot\troot\tNOUN\t_\t_\t0\troot\t_\t_
2\tof\tof\tADP\t_\t_\t3\tcase\t_\t_
3\tserver\tserver\tNOUN\t_\t_\t4\tdep\t1:nmod\t_
4\tx\tx\tNOUN\t_\t_\t1\tnmod\t_\t_
";
        let doc = ConlluReader::new().parse_str(data, None).unwrap();
        let sent = &doc[0];
        assert_eq!(sent[2].synt_link, Some(SyntLink::Nmod));
        assert_eq!(sent[2].parent_offs, -2);
    }

    #[test]
    fn test_conj_enhanced_dep_preferred() {
        let data = "\
1\tred\tred\tNOUN\t_\t_\t0\troot\t_\t_
2\tblue\tblue\tNOUN\t_\t_\t1\tdep\t4:punct|1:conj\t_
";
        let doc = ConlluReader::new().parse_str(data, None).unwrap();
        assert_eq!(doc[0][1].synt_link, Some(SyntLink::Conj));
        assert_eq!(doc[0][1].parent_offs, -1);
    }

    #[test]
    fn test_participle_refinement() {
        let data = "\
1\tразорванное\tразорвать\tVERB\t_\tTense=Past|Variant=Short|VerbForm=Part|Voice=Pass\t0\troot\t_\t_
2\tдумающая\tдумать\tVERB\t_\tTense=Pres|VerbForm=Part|Voice=Act\t1\tamod\t_\t_
3\tкрасив\tкрасивый\tADJ\t_\tVariant=Short\t1\tamod\t_\t_
";
        let doc = ConlluReader::new().parse_str(data, Some(Lang::Ru)).unwrap();
        let sent = &doc[0];
        assert_eq!(sent[0].pos_tag, PosTag::ParticipleShort);
        assert_eq!(sent[1].pos_tag, PosTag::Participle);
        assert_eq!(sent[1].tense, Some(Tense::Pres));
        assert_eq!(sent[2].pos_tag, PosTag::AdjShort);
    }

    #[test]
    fn test_ranges_and_empty_nodes_skipped() {
        let data = "\
1-2\tdel\t_\t_\t_\t_\t_\t_\t_\t_
1\tde\tde\tADP\t_\t_\t2\tcase\t_\t_
2\tel\tel\tDET\t_\t_\t0\troot\t_\t_
2.1\tghost\tghost\tNOUN\t_\t_\t_\t_\t_\t_
";
        let doc = ConlluReader::new().parse_str(data, None).unwrap();
        assert_eq!(doc[0].len(), 2);
    }

    #[test]
    fn test_malformed_line_errors() {
        let data = "1\tonly\tthree\n";
        assert!(ConlluReader::new().parse_str(data, None).is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{SIMPLE}").unwrap();
        let doc = ConlluReader::new().parse_file(f.path(), Some(Lang::En)).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_max_sentences() {
        let two = format!("{SIMPLE}\n{SIMPLE}");
        let reader = ConlluReader::with_config(ConlluReaderConfig {
            max_sentences: Some(1),
            ..Default::default()
        });
        let doc = reader.parse_str(&two, None).unwrap();
        assert_eq!(doc.len(), 1);
    }
}
