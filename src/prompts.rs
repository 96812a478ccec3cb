use crate::models::AnalysisTask;

/// Delimiter between meal items inside the build prompt.
const ITEM_DELIMITER: &str = ", ";

/// Instruction text sent alongside the forced tool call. Image analysis
/// pairs this with an image part; the other modes send text only.
pub fn instruction_for(task: &AnalysisTask) -> String {
    match task {
        AnalysisTask::ImageAnalysis { .. } => {
            "Analyze this meal image and provide detailed nutritional information. \
             Be as accurate as possible based on visible portions and ingredients. \
             Recognize Indian dishes where present and describe portions in Indian \
             conventions such as '1 katori', '1 roti' or '1 plate'."
                .to_string()
        }
        AnalysisTask::Search { query } => format!(
            "Provide detailed nutritional information for the food: {}. \
             Assume Indian preparation styles where the name is ambiguous, and \
             state the default portion in Indian conventions such as '1 katori', \
             '1 roti' or '1 piece' for a typical home-cooked serving.",
            query
        ),
        AnalysisTask::BuildMeal { items } => format!(
            "Calculate combined nutritional information for a meal consisting of: {}. \
             Treat every entry as one item with its stated quantity, interpret \
             portions in Indian conventions (a katori is roughly 150g, a roti \
             roughly 40g), and break the meal down item by item before totaling.",
            items.join(ITEM_DELIMITER)
        ),
        AnalysisTask::Compare { first, second } => format!(
            "Compare the nutritional value of {} vs {}. Compare both at a typical \
             single serving using Indian portion conventions such as '1 katori', \
             '1 roti' or '1 piece', name the nutritionally better food as the \
             winner, and keep the verdict practical for everyday meals.",
            first, second
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_instruction_describes_the_image_task() {
        let task = AnalysisTask::ImageAnalysis {
            image: "data:image/jpeg;base64,AAAA".to_string(),
        };
        let prompt = instruction_for(&task);

        assert!(prompt.contains("Analyze this meal image"));
        assert!(prompt.contains("katori"));
    }

    #[test]
    fn test_search_instruction_embeds_the_query() {
        let task = AnalysisTask::Search {
            query: "Paneer Butter Masala".to_string(),
        };

        assert!(instruction_for(&task).contains("the food: Paneer Butter Masala"));
    }

    #[test]
    fn test_build_instruction_joins_items_in_order() {
        let task = AnalysisTask::BuildMeal {
            items: vec!["2 Rotis".to_string(), "1 Katori Dal".to_string()],
        };

        assert!(instruction_for(&task).contains("2 Rotis, 1 Katori Dal"));
    }

    #[test]
    fn test_compare_instruction_embeds_the_pairing() {
        let task = AnalysisTask::Compare {
            first: "Roti".to_string(),
            second: "Rice".to_string(),
        };

        assert!(instruction_for(&task).contains("Roti vs Rice"));
    }
}
