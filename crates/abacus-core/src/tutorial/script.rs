//! Narration lines, in the learner's language (French).

pub const STAGE1_INTRO: &str = "Bienvenue dans la Counting Machine ! Commençons doucement. Pour l'instant, tu vois uniquement la colonne Unité. Le chiffre affiché est prêt à être modifié.";
pub const STAGE1_PRESS_UP: &str = "Essaie d'appuyer sur le bouton Haut.";
pub const STAGE1_KEEP_GOING: &str = "Parfait ! Continue. Clique encore sur Haut jusqu'à ce que tu en aies fait trois au total.";
pub const STAGE1_PRESS_DOWN: &str = "Super ! Maintenant, appuie trois fois sur le bouton Bas.";
pub const STAGE1_DONE: &str = "Bien joué ! Tu as compris comment modifier un chiffre. Quand tu es prêt, clique sur Valider pour passer à la suite.";

pub const STAGE2_COLUMNS: &str = "Maintenant, regardons les différentes colonnes. Ici, tu peux voir : Unité, Dizaine, Centaine, Millier.";
pub const STAGE2_RULE: &str = "Je vais t'envoyer un nombre, et tu devras reproduire chaque chiffre dans la bonne colonne. On commence par l'Unité, puis la Dizaine, puis la Centaine, et enfin le Millier.";
pub const STAGE2_FIRST_PRAISE: &str = "Parfait ! Clique sur Valider pour vérifier. Très bien ! Essayons avec un autre nombre.";
pub const STAGE2_PRAISE: &str = "Très bien ! Essayons avec un autre nombre.";
pub const STAGE2_DONE: &str = "Bravo ! Tu maîtrises les positions.";

pub const STAGE3_INTRO: &str = "On passe maintenant aux exercices libres ! Je vais te proposer des nombres aléatoires à compléter. Tu peux t'entraîner autant que tu veux.";
pub const STAGE3_PRAISE: &str = "Bien joué ! Tu veux continuer ou quitter le didacticiel ? Clique sur Quitter si tu veux revenir au menu.";

pub const FAREWELL: &str = "Tu as quitté le didacticiel. À bientôt !";

/// Spells a number digit by digit: `1234` becomes `"1 2 3 4"`.
pub fn spell_digits(value: u16) -> String {
    value
        .to_string()
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn stage2_goal(value: u16, first: bool) -> String {
    let spelled = spell_digits(value);
    if first {
        format!("Ton premier nombre est : {spelled}. Remplis les colonnes dans l'ordre indiqué.")
    } else {
        format!("Essayons avec le nombre : {spelled}.")
    }
}

pub fn stage3_goal(value: u16) -> String {
    format!("Complète le nombre : {}.", spell_digits(value))
}
