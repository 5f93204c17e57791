use ballot_console::protocol::{tally_tags, TaggedOutput};
use ballot_console::session::BallotTally;
use proptest::prelude::*;

fn tally() -> impl Strategy<Value = BallotTally> {
    prop::collection::vec(("[A-Za-z][A-Za-z :]{0,15}", 0u64..1000), 1..6).prop_map(|choices| {
        let total_voters = choices.iter().map(|(_, count)| count).sum();
        let (choices, vote_counts) = choices.into_iter().unzip();
        BallotTally {
            total_voters,
            choices,
            vote_counts,
        }
    })
}

proptest! {
    #[test]
    fn test_rendered_tally_parses_back(tally in tally(), noise in "[a-z ]{0,20}") {
        let mut stdout = format!("{}\n", noise);
        for tag in tally_tags(&tally) {
            stdout.push_str(&tag.to_string());
            stdout.push('\n');
        }
        prop_assert_eq!(TaggedOutput::parse(&stdout).tally().unwrap(), tally);
    }
}
